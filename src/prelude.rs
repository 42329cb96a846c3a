pub use crate::io::per::Error;
pub use crate::io::per::ErrorKind;
pub use crate::syn::bitstring::*;
pub use crate::syn::decode_all;
pub use crate::syn::numbers::*;
pub use crate::syn::octetstring::*;
pub use crate::syn::PerDecode;
