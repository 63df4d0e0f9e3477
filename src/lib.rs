//! Configflow - layered configuration loading for typed records.
//!
//! This library provides:
//! - Merging of maps, JSON/YAML/TOML files and environment variables into
//!   one namespace of dotted keys
//! - Binding that namespace onto declared fields with env/config key
//!   lookup, defaults and type coercion
//! - Declarative validation rules, built in or registered per loader
//!
//! # Example
//!
//! ```
//! use configflow::{Configurable, Field, Loader, Table, Value};
//!
//! #[derive(Debug, Default)]
//! struct AppConfig {
//!     port: i64,
//!     debug: bool,
//!     app_name: String,
//! }
//!
//! impl Configurable for AppConfig {
//!     fn fields() -> Vec<Field<Self>> {
//!         vec![
//!             Field::new("Port", |c: &mut Self| &mut c.port)
//!                 .key("port")
//!                 .env("PORT")
//!                 .validate("range:1000,9999")
//!                 .default("8080"),
//!             Field::new("Debug", |c: &mut Self| &mut c.debug)
//!                 .key("debug")
//!                 .default("false"),
//!             Field::new("AppName", |c: &mut Self| &mut c.app_name)
//!                 .key("app.name")
//!                 .default("MyApp"),
//!         ]
//!     }
//! }
//!
//! let mut defaults = Table::new();
//! defaults.insert("port".to_string(), Value::Int(3000));
//! defaults.insert("app.name".to_string(), Value::from("TestApp"));
//!
//! let config: AppConfig = Loader::new().add_map(defaults).load_new().unwrap();
//! assert_eq!(config.port, 3000);
//! assert!(!config.debug);
//! assert_eq!(config.app_name, "TestApp");
//! ```

pub mod bind;
pub mod error;
pub mod flatten;
pub mod loader;
pub mod merge;
pub mod source;
pub mod validate;
pub mod value;

pub use bind::{Configurable, Field, FieldKind, FieldMeta, FieldValue};
pub use error::{
	CoerceError, ConfigFlowError, ParseError, Result, RuleError, SourceError, ValidationError,
};
pub use flatten::{flatten, flatten_with_prefix, unflatten};
pub use loader::Loader;
pub use merge::{MergeOrder, Namespace, Origin};
pub use source::{EnvSource, FileFormat, FileSource, MapSource, Source, SourceKind};
pub use validate::{ValidatorFn, ValidatorRegistry};
pub use value::{FlatMap, Table, Value};
