//! Screens raw drafts into validated payloads, reporting every bad field.

use chrono::NaiveDate;

use super::domain::{
    CompanyRatings, CompanyReviewDraft, CompanyReviewPayload, EmploymentTerm, InterviewOutcome,
    InterviewReviewDraft, InterviewReviewPayload, PracticeArea, Rating, SalaryBasis,
};
use crate::validate::{clean_optional, require_text, FieldErrors, ValidationFailed};

/// Marker entry in `good_things` that stands for the reviewer's own wording.
const OTHER_HIGHLIGHT: &str = "other";
/// Referral answer that makes the free-text detail meaningful.
const OTHER_REFERRAL: &str = "etc";

pub(crate) fn company_payload(
    draft: CompanyReviewDraft,
) -> Result<CompanyReviewPayload, ValidationFailed> {
    let mut errors = FieldErrors::new();

    let company_name = require_text(&mut errors, "company_name", draft.company_name);
    let practice_area = require_parsed(
        &mut errors,
        "lawyer_type",
        draft.lawyer_type,
        PracticeArea::parse,
    );
    let employment_terms = require_parsed(
        &mut errors,
        "employment_terms",
        draft.employment_terms,
        EmploymentTerm::parse,
    );

    let overall = require_rating(&mut errors, "overall_rating", draft.overall_rating);
    let work_life_balance = require_rating(&mut errors, "work_life_balance", draft.work_life_balance);
    let salary_benefits = require_rating(&mut errors, "salary_benefits", draft.salary_benefits);
    let career_growth = require_rating(&mut errors, "career_growth", draft.career_growth);
    let culture_fit = require_rating(&mut errors, "culture_fit", draft.culture_fit);
    let management = require_rating(&mut errors, "management", draft.management);

    let highlights = merge_highlights(
        &mut errors,
        draft.good_things,
        clean_optional(draft.other_good_things),
    );

    let overtime_frequency = require_text(&mut errors, "overtime_frequency", draft.overtime_frequency);

    let years_of_experience = parse_optional_number::<u16>(
        &mut errors,
        "years_of_experience",
        draft.years_of_experience,
    );
    let salary = parse_optional_number::<u32>(&mut errors, "salary", draft.salary);
    let salary_basis = parse_optional(&mut errors, "salary_type", draft.salary_type, SalaryBasis::parse);

    let referral_source = require_text(&mut errors, "how_found", draft.how_found);
    let referral_detail = match referral_source.as_deref() {
        Some(OTHER_REFERRAL) => {
            let detail = clean_optional(draft.other_how_found);
            if detail.is_none() {
                errors.push("other_how_found", "describe how you found us");
            }
            detail
        }
        // Stale detail from a changed answer is dropped, not stored.
        _ => None,
    };

    let ratings = match (
        overall,
        work_life_balance,
        salary_benefits,
        career_growth,
        culture_fit,
        management,
    ) {
        (
            Some(overall),
            Some(work_life_balance),
            Some(salary_benefits),
            Some(career_growth),
            Some(culture_fit),
            Some(management),
        ) => Some(CompanyRatings {
            overall,
            work_life_balance,
            salary_benefits,
            career_growth,
            culture_fit,
            management,
        }),
        _ => None,
    };

    errors.finish()?;

    let (
        Some(company_name),
        Some(practice_area),
        Some(employment_terms),
        Some(ratings),
        Some(overtime_frequency),
        Some(referral_source),
    ) = (
        company_name,
        practice_area,
        employment_terms,
        ratings,
        overtime_frequency,
        referral_source,
    )
    else {
        return Err(ValidationFailed::single("payload", "incomplete submission"));
    };

    Ok(CompanyReviewPayload {
        company_name,
        practice_area,
        employment_terms,
        highlights,
        ratings,
        pros: clean_optional(draft.pros),
        cons: clean_optional(draft.cons),
        additional_comments: clean_optional(draft.additional_comments),
        overtime_frequency,
        overtime_comments: clean_optional(draft.overtime_comments),
        years_of_experience,
        salary,
        salary_basis,
        free_opinion: clean_optional(draft.free_opinion),
        referral_source,
        referral_detail,
    })
}

pub(crate) fn interview_payload(
    draft: InterviewReviewDraft,
) -> Result<InterviewReviewPayload, ValidationFailed> {
    let mut errors = FieldErrors::new();

    let company_name = require_text(&mut errors, "company_name", draft.company_name);
    let position = require_text(&mut errors, "position", draft.position);
    let interview_date = match require_text(&mut errors, "interview_date", draft.interview_date) {
        Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push("interview_date", "must be a YYYY-MM-DD date");
                None
            }
        },
        None => None,
    };
    let difficulty = require_rating(&mut errors, "interview_difficulty", draft.interview_difficulty);
    let experience = require_rating(&mut errors, "interview_experience", draft.interview_experience);
    let outcome = require_parsed(
        &mut errors,
        "interview_outcome",
        draft.interview_outcome,
        InterviewOutcome::parse,
    );
    let practice_area = require_parsed(
        &mut errors,
        "lawyer_type",
        draft.lawyer_type,
        PracticeArea::parse,
    );
    let employment_terms = require_parsed(
        &mut errors,
        "employment_terms",
        draft.employment_terms,
        EmploymentTerm::parse,
    );

    errors.finish()?;

    let (
        Some(company_name),
        Some(position),
        Some(interview_date),
        Some(difficulty),
        Some(experience),
        Some(outcome),
        Some(practice_area),
        Some(employment_terms),
    ) = (
        company_name,
        position,
        interview_date,
        difficulty,
        experience,
        outcome,
        practice_area,
        employment_terms,
    )
    else {
        return Err(ValidationFailed::single("payload", "incomplete submission"));
    };

    Ok(InterviewReviewPayload {
        company_name,
        position,
        interview_date,
        difficulty,
        experience,
        outcome,
        process: clean_optional(draft.interview_process),
        questions: clean_optional(draft.interview_questions),
        advice: clean_optional(draft.advice),
        practice_area,
        employment_terms,
    })
}

fn require_rating(errors: &mut FieldErrors, field: &str, value: Option<u8>) -> Option<Rating> {
    match value {
        None => {
            errors.push(field, "required");
            None
        }
        Some(value) => match Rating::new(value) {
            Some(rating) => Some(rating),
            None => {
                errors.push(
                    field,
                    format!("must be between {} and {}", Rating::MIN, Rating::MAX),
                );
                None
            }
        },
    }
}

fn require_parsed<T>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    parse: fn(&str) -> Option<T>,
) -> Option<T> {
    let text = require_text(errors, field, value)?;
    match parse(&text) {
        Some(parsed) => Some(parsed),
        None => {
            errors.push(field, format!("'{text}' is not a recognised value"));
            None
        }
    }
}

fn parse_optional<T>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    parse: fn(&str) -> Option<T>,
) -> Option<T> {
    let text = clean_optional(value)?;
    match parse(&text) {
        Some(parsed) => Some(parsed),
        None => {
            errors.push(field, format!("'{text}' is not a recognised value"));
            None
        }
    }
}

fn parse_optional_number<T: std::str::FromStr>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
) -> Option<T> {
    let text = clean_optional(value)?;
    match text.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(field, "must be a whole number");
            None
        }
    }
}

/// Replace an "other" marker in the picked highlights with the reviewer's
/// own wording; blank entries are dropped.
fn merge_highlights(
    errors: &mut FieldErrors,
    picked: Vec<String>,
    other: Option<String>,
) -> Vec<String> {
    let mut highlights = Vec::with_capacity(picked.len());
    for entry in picked {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == OTHER_HIGHLIGHT {
            match &other {
                Some(detail) => highlights.push(detail.clone()),
                None => errors.push("other_good_things", "describe the highlight marked as other"),
            }
        } else {
            highlights.push(trimmed.to_string());
        }
    }
    highlights
}
