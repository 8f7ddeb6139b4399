pub mod init;
pub mod print_schema;
pub mod serve;
