//! Schema-shadowing codec on top of `serde`.
//!
//! `serde` formats only know how to write the shapes of the serde data
//! model. Types that need a custom textual form (a MAC address, a network
//! prefix, a timestamp in a legacy format) would normally have to implement
//! `Serialize` and `Deserialize` themselves. `sc_codec` instead derives a
//! *shadow schema* of a data model at runtime from its `sc_reflect` type
//! information, replaces every type with a registered adapter by a string
//! leaf, copies the value into the shadow, and lets the format write that.
//! Decoding runs the same steps backwards.
//!
//! ## Menu
//!
//! - [`adapter`]: registration and lookup of string adapters.
//! - [`shadow`]: the [`ShadowType`](shadow::ShadowType) schema and its cache.
//! - [`transcode`]: copying values between a model and its shadow.
//! - [`wire`]: `serde` drivers over shadow values.
//! - [`annotate`]: default-diff opt-outs for [`Codec::encode_with_defaults`].
//! - [`codec`]: the [`Codec`] facade and the [`Format`] trait.
//! - [`net`]: the built-in [`MacAddr`](net::MacAddr) and [`IpNet`](net::IpNet) adapters.
//!
//! ```
//! use sc_codec::Codec;
//! use sc_codec::net::MacAddr;
//! use sc_reflect::derive::Reflect;
//!
//! #[derive(Reflect, Default)]
//! struct Port {
//!     pub name: String,
//!     pub mac: MacAddr,
//! }
//!
//! let codec = Codec::json();
//! let port = Port {
//!     name: "eth0".into(),
//!     mac: MacAddr::new([0x02, 0, 0, 0, 0, 0xff]),
//! };
//!
//! let json = codec.encode_to_string(&port).unwrap();
//! assert_eq!(json, r#"{"name":"eth0","mac":"02:00:00:00:00:ff"}"#);
//!
//! let mut decoded = Port::default();
//! codec.decode(json.as_bytes(), &mut decoded).unwrap();
//! assert_eq!(decoded.mac, port.mac);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod adapter;
pub mod annotate;
pub mod codec;
pub mod error;
pub mod net;
pub mod shadow;
pub mod transcode;
pub mod wire;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use adapter::{Direction, TypeTraitAdapter, register_adapter};
pub use codec::{Codec, Format, Json, Yaml};
pub use error::{BoxError, CodecError};
