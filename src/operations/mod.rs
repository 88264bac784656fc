/// Module for uploading files to remote server
pub(crate) mod upload;
