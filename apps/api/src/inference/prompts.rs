/// Prompt sent to the text-generation model for a job description. Title and
/// skills are inserted verbatim.
pub fn job_description_prompt(job_title: &str, skills: &str) -> String {
    format!("Create a job description for a {job_title} with skills: {skills}")
}
