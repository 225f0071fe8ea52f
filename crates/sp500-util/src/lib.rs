pub mod client_ext;
pub mod fs;

pub use crate::client_ext::util::{http_client, ClientUtilExt as Util};
pub use crate::fs::{read_text, write_file};
