// All LLM prompt templates for the analysis pipeline. Placeholders
// ({resume_text}, {job_text}, ...) are substituted before sending.
// Domain content adapted from the Ignatian career-counseling curriculum.

/// Step 1: resume analysis. Returns structured JSON.
pub const RESUME_ANALYSIS_TEMPLATE: &str = r#"Analyze the following resume and extract key information. Return a structured analysis in JSON format with these sections:

1. personal_info: Basic information (name, contact details if present)
2. skills: List of technical and soft skills mentioned
3. experience: Work experience with key responsibilities and achievements
4. education: Educational background
5. projects: Notable projects or accomplishments
6. strengths: Top 3-5 key strengths based on the content
7. career_level: Estimate career level (entry-level, mid-level, senior, executive)
8. industries: Industries or domains of experience

Resume text:
{resume_text}

Provide a comprehensive but concise analysis focused on professional capabilities."#;

/// Step 2: job description analysis. Returns structured JSON.
pub const JOB_ANALYSIS_TEMPLATE: &str = r#"Analyze the following job description and extract key information. Return a structured analysis in JSON format with these sections:

1. job_title: The position title
2. company: Company name if mentioned
3. required_skills: Essential technical and soft skills required
4. preferred_skills: Nice-to-have skills mentioned
5. responsibilities: Key job responsibilities and duties
6. qualifications: Education and experience requirements
7. job_level: Estimated level (entry-level, mid-level, senior, executive)
8. industry: Industry or domain
9. key_requirements: Top 5 most important requirements for this role
10. company_values: Any company values or culture mentions

Job description text:
{job_text}

Focus on what the employer is really looking for in an ideal candidate."#;

/// Step 3: candidate/role connections through the Ignatian lens. Returns JSON.
pub const CONNECTIONS_TEMPLATE: &str = r#"Using the Ignatian Pedagogical Paradigm approach, analyze the connections between this candidate's background and the job requirements. The IPP emphasizes context, experience, reflection, action, and evaluation.

Resume Analysis:
{resume_analysis}

Job Analysis:
{job_analysis}

Provide an analysis in JSON format with these sections:

1. skill_matches: Skills that directly align (with confidence scores 1-10)
2. experience_connections: How past experience relates to job requirements
3. growth_opportunities: Areas where the candidate can grow into the role
4. value_alignment: How candidate's background aligns with company values/mission
5. unique_strengths: What makes this candidate stand out for this role
6. development_areas: Skills or experiences the candidate should develop
7. portfolio_project_themes: 3-5 potential themes for portfolio projects that would demonstrate fit
8. ignatian_reflection_points: Key questions for deeper reflection on calling and purpose
9. overall_fit_score: Numerical score 1-10 for overall role fit
10. next_steps_suggestions: Recommendations for the candidate

Focus on authentic connections and growth opportunities, not just surface-level matches."#;

/// Step 4: narrative summary closing the Context stage. Returns plain prose.
pub const CONTEXT_SUMMARY_TEMPLATE: &str = r#"Create a compelling narrative summary that captures the Context stage of the Ignatian Pedagogical Paradigm. This should help the student understand their current situation in relation to their target role.

Resume Analysis: {resume_analysis}
Job Analysis: {job_analysis}
Connections: {connections}

Write a 2-3 paragraph summary that:
1. Acknowledges their current strengths and experience
2. Highlights the most promising connections to the target role
3. Sets the stage for deeper exploration in the Experience stage
4. Uses encouraging, reflective tone consistent with Ignatian pedagogy

Focus on helping the student see both their potential and their growth edge."#;

/// Fallback summary stored when the step-4 LLM call fails.
pub const SUMMARY_FALLBACK: &str = "Unable to generate context summary at this time.";
