//! Skill-string matching between resumes and jobs. Plain linear scans; no index, no ranking.

use crate::models::job::JobPosting;
use crate::models::resume::ResumeRecord;

/// Resumes with at least one non-empty skill that occurs verbatim (case-sensitive)
/// in the job description. Input order is preserved.
pub fn match_resumes(resumes: Vec<ResumeRecord>, job_description: &str) -> Vec<ResumeRecord> {
    resumes
        .into_iter()
        .filter(|resume| {
            resume
                .fields
                .skills
                .iter()
                .any(|skill| !skill.is_empty() && job_description.contains(skill.as_str()))
        })
        .collect()
}

/// Titles of jobs whose `requiredSkills` share at least one exact skill with `skills`.
/// Jobs without a title are skipped.
pub fn recommend_jobs(skills: &[String], jobs: &[JobPosting]) -> Vec<String> {
    jobs.iter()
        .filter(|job| {
            job.required_skills()
                .iter()
                .any(|required| skills.iter().any(|s| s == required))
        })
        .filter_map(|job| job.title().map(String::from))
        .collect()
}
