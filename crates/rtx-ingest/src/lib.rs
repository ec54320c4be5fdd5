pub mod config;
pub mod csv_table;
pub mod error;
pub mod output;

pub use config::{config_to_toml, load_config, load_config_or_default};
pub use csv_table::{read_table, read_table_from_reader};
pub use error::{IngestError, Result};
pub use output::{table_to_dataframe, write_table};
