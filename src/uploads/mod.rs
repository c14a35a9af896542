mod storage;

pub use storage::UploadStorage;
