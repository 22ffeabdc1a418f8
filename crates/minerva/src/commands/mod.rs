pub mod build;
pub mod init;
pub mod pagefind;
pub mod serve;
