mod product;
mod pvz;
mod reception;

pub use product::ProductService;
pub use pvz::PvzService;
pub use reception::ReceptionService;
