//! Score calibration and post-processing normalization.

use std::collections::HashSet;

use crate::analysis::models::AnalysisResult;

/// Weight of the model's calibrated score when blended with keyword overlap.
pub const MODEL_WEIGHT: f64 = 0.85;
/// Weight of the keyword overlap score.
pub const KEYWORD_WEIGHT: f64 = 0.15;

/// Spreads model scores that cluster in the 70s and 80s.
///
/// - 90 and above: kept, capped at 100
/// - 80-89: mapped to 75-84
/// - 70-79: mapped to 65-74
/// - below 70: kept
pub fn calibrate_score(raw: f64) -> f64 {
    if raw >= 90.0 {
        raw.min(100.0)
    } else if raw >= 80.0 {
        75.0 + (raw - 80.0)
    } else if raw >= 70.0 {
        65.0 + (raw - 70.0)
    } else {
        raw
    }
}

/// Percentage of distinct job-description words that also occur in the resume.
/// Case-insensitive, whitespace-tokenized.
pub fn keyword_match_score(resume_text: &str, job_description: &str) -> f64 {
    let resume_words: HashSet<String> = resume_text
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    let job_words: HashSet<String> = job_description
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    if job_words.is_empty() {
        return 0.0;
    }
    let matches = job_words.intersection(&resume_words).count();
    round2(matches as f64 / job_words.len() as f64 * 100.0)
}

/// `0.85 * calibrated + 0.15 * keyword`, rounded to two decimals.
pub fn blend_with_keywords(calibrated: f64, keyword: f64) -> f64 {
    round2(calibrated * MODEL_WEIGHT + keyword * KEYWORD_WEIGHT)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clamps into 0-100 and rounds. NaN becomes 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    round2(value.clamp(0.0, 100.0))
}

/// Applies the rules every result obeys regardless of which backend made it.
///
/// A resume analysed without a job description has no score: it is forced to
/// 0 and the comprehensive analysis carries the narrative. With a job
/// description the comprehensive field is dropped.
pub fn normalize_result(result: AnalysisResult, has_comparison: bool) -> AnalysisResult {
    match result {
        AnalysisResult::Resume(mut r) => {
            if has_comparison {
                r.score = clamp_score(r.score);
                r.comprehensive_analysis = None;
            } else {
                r.score = 0.0;
                r.comprehensive_analysis = r
                    .comprehensive_analysis
                    .filter(|text| !text.trim().is_empty());
            }
            AnalysisResult::Resume(r)
        }
        AnalysisResult::Linkedin(mut r) => {
            r.profile_strength_score = clamp_score(r.profile_strength_score);
            AnalysisResult::Linkedin(r)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::{LinkedinAnalysis, ResumeAnalysis};

    fn resume(score: f64) -> ResumeAnalysis {
        ResumeAnalysis {
            score,
            comprehensive_analysis: Some("Well structured resume.".to_string()),
            summary_feedback: "s".to_string(),
            skills_feedback: "k".to_string(),
            experience_feedback: "e".to_string(),
            education_feedback: "ed".to_string(),
            project_feedback: "p".to_string(),
            job_role_suggestions: "j".to_string(),
            overall_suggestions: "o".to_string(),
        }
    }

    #[test]
    fn test_calibration_bands() {
        assert_eq!(calibrate_score(95.0), 95.0);
        assert_eq!(calibrate_score(120.0), 100.0);
        assert_eq!(calibrate_score(85.0), 80.0);
        assert_eq!(calibrate_score(72.0), 67.0);
        assert_eq!(calibrate_score(40.0), 40.0);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let score = keyword_match_score("Rust Tokio Postgres", "rust tokio kafka kubernetes");
        assert!((score - 50.0).abs() < f64::EPSILON, "Score was {score}");
    }

    #[test]
    fn test_keyword_match_empty_jd_is_zero() {
        assert_eq!(keyword_match_score("anything", "   "), 0.0);
    }

    #[test]
    fn test_blend_weights() {
        assert_eq!(blend_with_keywords(80.0, 40.0), 74.0);
    }

    #[test]
    fn test_no_comparison_forces_zero_score() {
        for backend_score in [0.0, 55.5, 100.0, 250.0, -3.0] {
            let result = normalize_result(AnalysisResult::Resume(resume(backend_score)), false);
            match result {
                AnalysisResult::Resume(r) => {
                    assert_eq!(r.score, 0.0);
                    assert!(r.comprehensive_analysis.is_some());
                }
                other => panic!("unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn test_comparison_clamps_and_drops_comprehensive() {
        let result = normalize_result(AnalysisResult::Resume(resume(130.0)), true);
        match result {
            AnalysisResult::Resume(r) => {
                assert_eq!(r.score, 100.0);
                assert!(r.comprehensive_analysis.is_none());
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_linkedin_score_clamped() {
        let result = normalize_result(
            AnalysisResult::Linkedin(LinkedinAnalysis {
                profile_strength_score: -10.0,
                headline_feedback: String::new(),
                summary_feedback: String::new(),
                experience_feedback: String::new(),
                skills_feedback: String::new(),
                activity_feedback: String::new(),
                keyword_suggestions: String::new(),
                overall_suggestions: String::new(),
            }),
            false,
        );
        match result {
            AnalysisResult::Linkedin(r) => assert_eq!(r.profile_strength_score, 0.0),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }
}
