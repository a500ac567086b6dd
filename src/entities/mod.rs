// Entity Models - the four catalog record kinds
//
// Category → Product → Brand → Sale. Each parent key is a `ParentRef`,
// which accepts either a bare id or an expanded (populated) record.

pub mod brand;
pub mod category;
pub mod product;
pub mod reference;
pub mod sale;

pub use brand::Brand;
pub use category::Category;
pub use product::Product;
pub use reference::{EmbeddedParent, ParentRef};
pub use sale::Sale;
