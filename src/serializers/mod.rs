//! Response shaping and field codecs
//!
//! - [`dynamic_fields`]: keep only the fields a client asked for
//! - [`base64_image`]: decode base64 image uploads
//! - [`translations`]: per-language field maps
//! - [`actions`]: pick a serializer per view action or HTTP method

pub mod actions;
pub mod base64_image;
pub mod dynamic_fields;
pub mod translations;

pub use actions::{MethodSerializers, SerializerSet};
pub use base64_image::{Base64ImageField, DecodedFile};
pub use dynamic_fields::select_fields;
pub use translations::{TranslatedFields, Translations};
