pub mod error;
pub mod file;
pub mod filesystem;
pub mod info;
pub mod meta;
pub mod mode;
pub mod path;
pub mod pcloud;
pub mod resolver;

pub use error::{FsError, FsResult};
pub use file::{InitialContent, RemoteFile};
pub use filesystem::{Filesystem, FsFile};
pub use info::{Info, Namespace, Permissions, RawInfo, ResourceType};
pub use meta::FsMeta;
pub use mode::Mode;
pub use pcloud::PCloudFs;
pub use resolver::MetadataResolver;
