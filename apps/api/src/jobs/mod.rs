// Job postings and applications, plus the job-side helpers: resume matching
// against a description and description generation via the inference client.

pub mod handlers;
