// Shared prompt fragments and the placeholder filler used by every template.
// Each feature that talks to the model keeps its own prompts.rs alongside it.

/// Persona shared by every resume prompt.
pub const PERSONA: &str = "You are ResumeChecker, an expert in resume analysis \
    with years of experience screening candidates for technical and non-technical roles.";

/// Output formatting instruction appended to every prompt.
pub const FORMATTING_INSTRUCTION: &str = "Format your answer in Markdown with short \
    headings and bullet points. Refer only to content that appears in the resume; \
    do not invent experience, employers, or qualifications.";

/// Fills `{name}` placeholders in a single left-to-right scan.
///
/// Substituted values are copied verbatim and never rescanned, so user text that
/// happens to contain `{resume}` or `{job_description}` is not expanded again.
/// Braces that do not name a known placeholder are kept as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
