pub mod fachada;
pub mod soap;

pub use fachada::FachadaSgs;
pub use soap::{SoapValue, XmlNode};
