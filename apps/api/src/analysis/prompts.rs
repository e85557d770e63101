// Prompt templates for resume analysis and follow-up questions.
// Shared fragments (persona, formatting, the placeholder filler) live in llm_client::prompts.

use crate::analysis::mode::AnalysisMode;
use crate::llm_client::prompts::{fill_template, FORMATTING_INSTRUCTION, PERSONA};

/// A fixed instruction template for one analysis mode.
/// Placeholders: {persona}, {formatting}, {resume}, {job_description}.
#[derive(Debug)]
pub struct PromptTemplate {
    pub mode: AnalysisMode,
    pub body: &'static str,
}

impl PromptTemplate {
    /// Embeds the document text and job description verbatim. An empty job
    /// description is embedded as an empty string.
    pub fn render(&self, document_text: &str, job_description: &str) -> String {
        fill_template(
            self.body,
            &[
                ("persona", PERSONA),
                ("formatting", FORMATTING_INSTRUCTION),
                ("resume", document_text),
                ("job_description", job_description),
            ],
        )
    }
}

const QUICK_SCAN_TEMPLATE: &str = r#"{persona}

Provide a QUICK SCAN of the resume below. Keep it brief: the reader wants a first impression in under a minute.

Cover:
1. Overall impression in two or three sentences
2. Top three strengths
3. Top three weaknesses or gaps
4. If a job description is provided, a one-line verdict on fit for that role; otherwise skip this point

{formatting}

Resume:
{resume}

Job Description:
{job_description}"#;

const DETAILED_TEMPLATE: &str = r#"{persona}

Provide a DETAILED REVIEW of the resume below.

Cover:
1. Summary of the candidate's profile and seniority
2. Section-by-section review (contact details, summary, experience, education, skills, projects), noting what works and what does not
3. Impact: which bullet points are quantified, which are not, and how to quantify them
4. Language and clarity: weak verbs, filler, inconsistent tense or formatting
5. Alignment with the job description, if one is provided: matched requirements, missing requirements, and how to close each gap
6. Concrete rewrite suggestions for the three weakest bullet points
7. A prioritized list of changes, most important first

{formatting}

Resume:
{resume}

Job Description:
{job_description}"#;

const ATS_OPTIMIZATION_TEMPLATE: &str = r#"{persona} You specialise in Applicant Tracking System (ATS) optimization.

Analyze the resume below for how well it would pass automated ATS screening.

Cover:
1. Parseability: layout, columns, tables, headers/footers, graphics or special characters that ATS software commonly misreads
2. Section headings: whether standard headings are used and recognisable
3. Keyword coverage: relevant keywords already present; if a job description is provided, keywords and phrases from it that are missing or underused
4. Formatting issues: dates, job titles, file-level concerns
5. An estimated ATS compatibility rating from 1 to 10 with a one-sentence justification
6. Specific edits that would raise the rating, most impactful first

{formatting}

Resume:
{resume}

Job Description:
{job_description}"#;

/// Lookup table: one template per mode, nothing else.
static TEMPLATES: [PromptTemplate; 3] = [
    PromptTemplate {
        mode: AnalysisMode::QuickScan,
        body: QUICK_SCAN_TEMPLATE,
    },
    PromptTemplate {
        mode: AnalysisMode::Detailed,
        body: DETAILED_TEMPLATE,
    },
    PromptTemplate {
        mode: AnalysisMode::AtsOptimization,
        body: ATS_OPTIMIZATION_TEMPLATE,
    },
];

/// Returns the template registered for `mode`.
pub fn select_template(mode: AnalysisMode) -> &'static PromptTemplate {
    // Index matches the declaration order of AnalysisMode.
    let template = &TEMPLATES[mode as usize];
    debug_assert_eq!(template.mode, mode);
    template
}

/// Follow-up question template. Placeholders: {persona}, {question}, {resume}, {analysis}.
const FOLLOW_UP_TEMPLATE: &str = r#"{persona}

Based on the above resume and analysis, answer the following question. Answer directly and refer to specific parts of the resume or analysis where relevant.

Question:
{question}

Resume:
{resume}

Analysis:
{analysis}"#;

/// Builds the self-contained follow-up prompt. Each follow-up carries the full
/// document and prior analysis; there is no server-side conversation.
pub fn render_follow_up(document_text: &str, prior_analysis: &str, question: &str) -> String {
    fill_template(
        FOLLOW_UP_TEMPLATE,
        &[
            ("persona", PERSONA),
            ("question", question),
            ("resume", document_text),
            ("analysis", prior_analysis),
        ],
    )
}
