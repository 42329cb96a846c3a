#![deny(rustdoc::broken_intra_doc_links)]
#![warn(unused_extern_crates)]

//! Decoding of ASN.1 values encoded with the Packed Encoding Rules, ITU-T X.691, in both the
//! ALIGNED and the UNALIGNED variant.
//!
//! The bit level engine lives in [`io::per`], the value decoders in [`syn`]. Schema-driven
//! callers usually only need [`prelude`].

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_derive;

pub mod io;
pub mod prelude;
pub mod syn;
