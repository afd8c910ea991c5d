// Analysis LLM prompt templates.
// Placeholders in braces are filled in one pass by `fill_template`.
// {scoring_rubric} and {score_format} come from llm_client::prompts.

pub const RESUME_ROLE: &str = "You are an expert ATS (Applicant Tracking System) evaluator and career coach.";

pub const RESUME_COMPREHENSIVE_PROMPT: &str = r#"Analyze the resume carefully and give constructive, actionable feedback.

{scoring_rubric}

RESUME TEXT:
{resume_text}

Return the result in EXACTLY this JSON format (keys and structure must match exactly):
{
    "score": <number between 0-100>,
    "comprehensiveAnalysis": "<detailed overall analysis of the resume>",
    "summaryFeedback": "<feedback on the summary/objective>",
    "skillsFeedback": "<feedback on skills relevance and presentation>",
    "experienceFeedback": "<feedback on work experience relevance and impact>",
    "educationFeedback": "<feedback on education background>",
    "projectFeedback": "<feedback on projects and achievements>",
    "jobRoleSuggestions": "<suggestions for better job role positioning>",
    "overallSuggestions": "<overall recommendations for improvement, as a numbered list>"
}

{score_format}"#;

pub const RESUME_JOB_PROMPT: &str = r#"Analyze the following resume against the provided job description and give detailed, constructive feedback.

{scoring_rubric}

RESUME TEXT:
{resume_text}

JOB DESCRIPTION:
{job_description}

Return the result in EXACTLY this JSON format (keep the same keys as shown):
{
    "score": <number between 0-100>,
    "summaryFeedback": "<feedback on the summary/objective>",
    "skillsFeedback": "<feedback on skills alignment with job requirements>",
    "experienceFeedback": "<feedback on work experience relevance>",
    "educationFeedback": "<feedback on education background>",
    "projectFeedback": "<feedback on projects and achievements>",
    "jobRoleSuggestions": "<suggestions for better job role positioning>",
    "overallSuggestions": "<overall recommendations for improvement, as a numbered list>"
}

{score_format}
If the resume is a perfect match for the job description, do not hesitate to score above 90."#;

pub const LINKEDIN_ROLE: &str = "You are a LinkedIn branding expert and career coach.";

pub const LINKEDIN_PROMPT: &str = r#"Evaluate the LinkedIn profile content and provide constructive, improvement-focused feedback.

{scoring_rubric}

LINKEDIN PROFILE TEXT:
{profile_text}

Return the result in EXACTLY this JSON format (all values must be strings except profileStrengthScore):
{
    "profileStrengthScore": <number between 0-100>,
    "headlineFeedback": "<feedback on profile headline optimization>",
    "summaryFeedback": "<feedback on profile summary/about section>",
    "experienceFeedback": "<feedback on experience descriptions; recommend the STAR method and quantified achievements>",
    "skillsFeedback": "<feedback on skills section and endorsements>",
    "activityFeedback": "<feedback on posts, articles, and engagement>",
    "keywordSuggestions": "<comma-separated keywords to include for recruiter search>",
    "overallSuggestions": "<overall recommendations for profile optimization, as a numbered list>"
}

{score_format}"#;

pub const GITHUB_PROFILE_ROLE: &str =
    "You are a senior engineering manager reviewing a candidate's GitHub profile.";

pub const GITHUB_PROFILE_PROMPT: &str = r#"Analyze the following repository data to provide insights into the candidate's tech stack and development practices.

GITHUB PROFILE DATA:
Username: {username}
Number of repositories: {repo_count}

Repository Details:
{repo_details}

Language distribution (repository count per language):
{language_summary}

Return the result in EXACTLY this JSON format. ALL VALUES MUST BE STRINGS:
{
    "techStack": "<detailed analysis of the technology stack and programming languages used>",
    "codeQualityInsights": "<insights about code quality based on repository structure, naming, descriptions, and activity>",
    "overallSuggestions": "<suggestions for improving the GitHub profile and development practices, as a numbered list>"
}

Focus on:
1. Diversity and depth of technology stack
2. Project complexity and innovation
3. Consistency in development activity
4. Documentation quality (based on descriptions)
5. Open source contributions and collaboration
6. Professional presentation of work

Include general recommendations, but do not include any URLs."#;

pub const GITHUB_REPOSITORY_ROLE: &str =
    "You are an experienced open-source project maintainer and documentation expert.";

pub const GITHUB_REPOSITORY_PROMPT: &str = r#"Analyze the following repository README for quality, clarity, and completeness.

REPOSITORY URL: {repository_url}

README CONTENT:
{readme}

Return the result in EXACTLY this JSON format:
{
    "purposeFeedback": "<feedback on how clearly the project purpose and goals are communicated>",
    "documentationQualityFeedback": "<feedback on documentation quality, completeness, and clarity>",
    "overallSuggestions": "<overall suggestions for improving the repository documentation, as a numbered list>"
}

Focus on:
1. Project description and purpose clarity
2. Installation and setup instructions
3. Usage examples and documentation
4. Contribution guidelines
5. Code organization and structure explanation
6. Missing essential sections"#;
