//! Turns review service responses into markdown
//!
//! The review backend's `/upload-cv` endpoint answers with a JSON envelope
//! (CV review plus job matches). Other deployments answer with markdown or
//! plain text. Either way the result panel receives markdown.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
struct ReviewEnvelope {
    cv_review: CvReview,
    #[serde(default)]
    job_recommendations: Option<JobRecommendations>,
    // Shape used when no skills could be extracted
    #[serde(default)]
    matching_jobs: Vec<JobMatch>,
    #[serde(default)]
    message: Option<String>,
}

// `cv_review` can be the model's raw JSON, so its fields tolerate `null`
// and wrong types instead of failing the whole envelope.
#[derive(Deserialize, Default)]
#[serde(default)]
struct CvReview {
    #[serde(deserialize_with = "lenient_text")]
    summary: String,
    #[serde(deserialize_with = "lenient_list")]
    strengths: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    improvements: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    experience_level: String,
    #[serde(alias = "skills", deserialize_with = "lenient_list")]
    extracted_skills: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct JobRecommendations {
    jobs: Vec<JobMatch>,
}

#[derive(Deserialize)]
struct JobMatch {
    job: Job,
    #[serde(default, deserialize_with = "lenient_score")]
    relevance_score: i64,
    #[serde(default, deserialize_with = "lenient_list")]
    matched_skills: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Job {
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
    remote_option: Option<String>,
    job_type: Option<String>,
    salary_range: Option<String>,
    link: Option<String>,
    description: Option<String>,
}

/// Strings as-is, numbers and booleans stringified, anything else empty
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Arrays keep their text items; a lone string becomes a one-item list
fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

#[derive(Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// Markdown for a response body. Bodies that are not a review envelope are
/// returned as they are.
pub fn interpret(body: &str) -> String {
    let trimmed = body.trim_start();
    if !trimmed.starts_with('{') {
        return body.to_string();
    }
    if let Ok(envelope) = serde_json::from_str::<ReviewEnvelope>(trimmed) {
        return render_envelope(&envelope);
    }
    if let Ok(error) = serde_json::from_str::<ErrorDetail>(trimmed) {
        return format!("> {}", error.detail);
    }
    body.to_string()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn push_section(out: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push(format!("## {title}"));
    out.push(String::new());
    out.extend(items.iter().map(|item| format!("- {}", item.trim())));
    out.push(String::new());
}

fn render_envelope(envelope: &ReviewEnvelope) -> String {
    let review = &envelope.cv_review;
    let mut out = Vec::new();

    if !review.summary.trim().is_empty() {
        out.push("## Summary".to_string());
        out.push(String::new());
        out.push(review.summary.trim().to_string());
        out.push(String::new());
    }
    if let Some(level) = Some(review.experience_level.trim()).filter(|l| !l.is_empty()) {
        out.push(format!("**Experience level:** {level}"));
        out.push(String::new());
    }

    push_section(&mut out, "Strengths", &review.strengths);
    push_section(&mut out, "Improvements", &review.improvements);

    if !review.extracted_skills.is_empty() {
        out.push("## Skills".to_string());
        out.push(String::new());
        let skills: Vec<String> = review
            .extracted_skills
            .iter()
            .map(|s| format!("`{}`", s.trim()))
            .collect();
        out.push(skills.join(", "));
        out.push(String::new());
    }

    let jobs = envelope
        .job_recommendations
        .as_ref()
        .map(|r| r.jobs.as_slice())
        .filter(|jobs| !jobs.is_empty())
        .unwrap_or(envelope.matching_jobs.as_slice());
    if !jobs.is_empty() {
        out.push("## Job Recommendations".to_string());
        out.push(String::new());
        for (i, m) in jobs.iter().enumerate() {
            render_job(&mut out, i + 1, m);
        }
    }

    if let Some(message) = non_empty(&envelope.message) {
        out.push(format!("> {message}"));
    }

    out.join("\n").trim_end().to_string()
}

fn render_job(out: &mut Vec<String>, rank: usize, m: &JobMatch) {
    let job = &m.job;
    let title = non_empty(&job.title).unwrap_or("Untitled role");
    match non_empty(&job.company) {
        Some(company) => out.push(format!("### {rank}. {title} at {company}")),
        None => out.push(format!("### {rank}. {title}")),
    }
    out.push(String::new());

    let mut details = Vec::new();
    let location = [non_empty(&job.location), non_empty(&job.remote_option), non_empty(&job.job_type)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    if !location.is_empty() {
        details.push(format!("- **Where:** {}", location.join(" · ")));
    }
    if let Some(salary) = non_empty(&job.salary_range) {
        details.push(format!("- **Salary:** {salary}"));
    }
    if m.matched_skills.is_empty() {
        details.push(format!("- **Relevance:** {}", m.relevance_score));
    } else {
        details.push(format!(
            "- **Relevance:** {} ({})",
            m.relevance_score,
            m.matched_skills.join(", ")
        ));
    }
    if let Some(link) = non_empty(&job.link) {
        details.push(format!("- [View posting]({link})"));
    }
    out.extend(details);
    out.push(String::new());

    if let Some(description) = non_empty(&job.description) {
        out.extend(description.lines().map(escape_block_start));
        out.push(String::new());
    }
}

/// Keep a line of free text from opening a heading, list, quote or fence
fn escape_block_start(line: &str) -> String {
    let line = line.trim_start();
    let ordinal = line.find(|c: char| !c.is_ascii_digit()).filter(|&i| {
        i > 0 && matches!(line.as_bytes()[i], b'.' | b')')
    });
    match (ordinal, line.chars().next()) {
        (Some(i), _) => format!("{}\\{}", &line[..i], &line[i..]),
        (None, Some('#' | '-' | '+' | '*' | '>' | '=' | '`' | '~' | '|')) => format!("\\{line}"),
        _ => line.to_string(),
    }
}
