pub mod config;
pub mod content;
pub mod error;
pub mod metadata;
pub mod settings;
pub mod skeleton;

pub use config::{ConfigDocument, RandoConfigFile, Side, SideState, lazy_reload, load_all};
pub use content::{Asset, AssetKind, ContentIndex, ContentSource};
pub use error::ConfigError;
pub use metadata::{AudioRegistry, MetadataBuilder, RandoMetadata};
pub use settings::LoaderSettings;
