// Resume ingestion: upload → text extraction → labeled-line parsing → persistence,
// plus JSON submission, search, count and delete over stored resumes.

pub mod handlers;
pub mod parser;
pub mod upload;
