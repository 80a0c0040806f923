//! Schema-shadowing codec engine.
//!
//! `sc_core` bundles the workspace crates under short names:
//!
//! - [`reflect`]: runtime type descriptors, value access and the type registry.
//! - [`codec`]: shadow schemas, transcoding, default-diff output and the
//!   [`Codec`](codec::Codec) facade.
//!
//! ```
//! use sc_core::codec::Codec;
//! use sc_core::reflect::derive::Reflect;
//!
//! #[derive(Reflect, Default)]
//! struct Server {
//!     pub name: String,
//!     pub port: u16,
//! }
//!
//! let codec = Codec::new();
//! let text = codec.encode_to_string(&Server { name: "edge".into(), port: 8080 }).unwrap();
//! assert_eq!(text, "name: edge\nport: 8080\n");
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use sc_codec as codec;
pub use sc_reflect as reflect;
