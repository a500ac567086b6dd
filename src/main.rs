use anyhow::{bail, Result};
use chrono::{Datelike, Utc};
use rusqlite::Connection;
use std::env;
use std::path::{Path, PathBuf};

use sales_report::{
    aggregate, get_sales_for_year, insert_sales, load_catalog, load_sales_csv,
    parse_month_window, resolve_brand_scope, seed_demo_data, setup_database, Anchor,
};

fn db_path() -> PathBuf {
    env::var("SALES_REPORT_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("sales-report.db"))
}

fn open_database() -> Result<Connection> {
    let path = db_path();
    let conn = Connection::open(&path)?;
    setup_database(&conn)?;
    Ok(conn)
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("seed") => run_seed(),
        Some("import") => {
            let Some(csv_path) = args.get(2) else {
                bail!("Usage: sales-report import <csv-file>");
            };
            run_import(Path::new(csv_path))
        }
        Some("report") => run_report(&args[2..]),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("Sales Report {}", sales_report::VERSION);
    println!();
    println!("Usage:");
    println!("  sales-report seed                  Create the database and demo catalog");
    println!("  sales-report import <csv-file>     Bulk-import sales (brandId,month,year,value)");
    println!("  sales-report report [options]      Print a sales report");
    println!();
    println!("Report options:");
    println!("  --category <id> | --product <id> | --brand <id>   Filter scope");
    println!("  --months <m,m,...>                                Month window (default 1,2,3,4)");
    println!("  --year <year>                                     Year (default: current)");
    println!();
    println!("Database path comes from SALES_REPORT_DB (default: sales-report.db).");
}

fn run_seed() -> Result<()> {
    println!("Seeding demo catalog into {:?}", db_path());

    let conn = open_database()?;
    let summary = seed_demo_data(&conn)?;

    println!(
        "✓ Seeded {} categories, {} products, {} brands, {} sales",
        summary.categories, summary.products, summary.brands, summary.sales
    );
    Ok(())
}

fn run_import(csv_path: &Path) -> Result<()> {
    println!("Importing sales from {:?}", csv_path);

    let sales = load_sales_csv(csv_path)?;
    println!("✓ Loaded {} sales from CSV", sales.len());

    let conn = open_database()?;
    let inserted = insert_sales(&conn, &sales)?;
    println!("✓ Inserted {} sales", inserted);
    Ok(())
}

fn flag_value<'a>(it: &mut std::slice::Iter<'a, String>, flag: &str) -> Result<&'a String> {
    it.next()
        .ok_or_else(|| anyhow::anyhow!("Missing value for {flag}"))
}

/// Parse `--category/--product/--brand/--months/--year` report flags.
fn parse_report_args(args: &[String]) -> Result<(Anchor, Vec<u8>, i32)> {
    let mut anchor = Anchor::None;
    let mut months = None;
    let mut year = Utc::now().year();

    let mut it = args.iter();
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--category" => anchor = Anchor::Category(flag_value(&mut it, flag)?.clone()),
            "--product" => anchor = Anchor::Product(flag_value(&mut it, flag)?.clone()),
            "--brand" => anchor = Anchor::Brand(flag_value(&mut it, flag)?.clone()),
            "--months" => months = Some(flag_value(&mut it, flag)?.clone()),
            "--year" => year = flag_value(&mut it, flag)?.parse()?,
            other => bail!("Unknown option: {other}"),
        }
    }

    let window = parse_month_window(months.as_deref());
    Ok((anchor, window, year))
}

fn run_report(args: &[String]) -> Result<()> {
    let (anchor, window, year) = parse_report_args(args)?;

    let conn = open_database()?;
    let catalog = load_catalog(&conn)?;
    let sales = get_sales_for_year(&conn, year)?;

    let scope = resolve_brand_scope(&anchor, &catalog);
    let report = aggregate(&sales, &scope, &window);

    match scope.len() {
        None => println!("Sales report for {year}, all brands"),
        Some(n) => println!("Sales report for {year}, {n} brand(s) in scope"),
    }
    println!();
    for (month, total) in window.iter().zip(&report.per_month) {
        println!("  Month {:>2}: {:>12.2}", month, total);
    }
    println!();
    println!("  Total:   {:>12.2}", report.total);
    println!("  Average: {:>12.2}", report.average);
    println!("  Max:     {:>12.2}", report.max);
    println!("  Min:     {:>12.2}", report.min);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_report_args_defaults() {
        let (anchor, window, year) = parse_report_args(&[]).unwrap();

        assert_eq!(anchor, Anchor::None);
        assert_eq!(window, vec![1, 2, 3, 4]);
        assert_eq!(year, Utc::now().year());
    }

    #[test]
    fn test_parse_report_args_brand_and_window() {
        let (anchor, window, year) =
            parse_report_args(&strings(&["--brand", "b-1", "--months", "2,3", "--year", "2025"]))
                .unwrap();

        assert_eq!(anchor, Anchor::Brand("b-1".into()));
        assert_eq!(window, vec![2, 3]);
        assert_eq!(year, 2025);
    }

    #[test]
    fn test_parse_report_args_rejects_unknown_flag() {
        assert!(parse_report_args(&strings(&["--bogus"])).is_err());
        assert!(parse_report_args(&strings(&["--brand"])).is_err());
    }
}
