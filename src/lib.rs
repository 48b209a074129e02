pub mod meta;
pub mod mock;
pub mod recorder;
pub mod registry;
pub mod store;
pub mod table;
pub mod tape;
pub mod view;

pub use meta::{MessageMeta, NameTable, NameTables, ServiceTags};
pub use recorder::{LoggedMessage, MessageLogger};
pub use registry::{MessageData, MessageRegistry, MsgHandle, RegistryError};
pub use store::{FileFlagStore, FlagStore, MemoryFlagStore, RECORD_FLAG_KEY};
pub use table::{FlatMessage, Table};
pub use tape::{MessageTape, TapeEntry, TapeError};
pub use view::MessagesOut;
