use clap::Args;
use counselboard::error::AppError;
use counselboard::lawyers::{LicenseUpload, SignupRequest, VerificationDecision};
use counselboard::reviews::{
    CompanyReviewDraft, InterviewReviewDraft, ModerationDecision, ReviewDraft, SubmissionPolicy,
};

use crate::infra;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Leave the rejected review unrevised at the end of the walkthrough
    #[arg(long)]
    pub(crate) skip_revision: bool,
}

/// End-to-end walkthrough against the in-memory adapters: signup, license
/// approval, review submission, moderation, and the revision loop.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let backing = infra::backing();
    let signup = infra::signup_service(&backing);
    let verification = infra::verification_service(&backing, 60);
    let reviews = infra::review_service(&backing, SubmissionPolicy::default());

    println!("Counselboard lifecycle demo");

    let Some(admin) = infra::seed_admin(&backing, "admin@counselboard.dev", "demo-admin") else {
        println!("  Demo aborted: could not seed the administrator");
        return Ok(());
    };
    println!("- Seeded administrator {}", admin.email);

    let member = match signup.sign_up(SignupRequest {
        email: "counsel@counselboard.dev".to_string(),
        password: "correct-horse".to_string(),
        nickname: "demo counsel".to_string(),
        license: LicenseUpload {
            file_name: "bar-license.pdf".to_string(),
            bytes: b"%PDF-1.4 demo license".to_vec(),
        },
    }) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  Signup failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- {} signed up, profile {} is {}",
        member.account.email,
        member.profile.id.0,
        member.profile.status.label()
    );

    let queue = match verification.pending(&admin) {
        Ok(queue) => queue,
        Err(err) => {
            println!("  Pending queue unavailable: {err}");
            return Ok(());
        }
    };
    for entry in &queue {
        println!(
            "- Pending verification: {} <{}> license at {}",
            entry.nickname,
            entry.email,
            entry.license_url.as_deref().unwrap_or("(unsigned)")
        );
    }

    if let Err(err) = verification.decide(&admin, &member.profile.id, VerificationDecision::Approved)
    {
        println!("  Approval failed: {err}");
        return Ok(());
    }
    println!("- Profile {} approved", member.profile.id.0);

    let company = match reviews.submit_company(&member.account, company_draft()) {
        Ok(record) => record,
        Err(err) => {
            println!("  Company review rejected: {err}");
            return Ok(());
        }
    };
    let interview = match reviews.submit_interview(&member.account, interview_draft()) {
        Ok(record) => record,
        Err(err) => {
            println!("  Interview review rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Submitted {} and {} (both {})",
        company.id.0,
        interview.id.0,
        company.status.label()
    );

    if let Err(err) = reviews.moderate(&admin, &company.id, ModerationDecision::Approved) {
        println!("  Moderation failed: {err}");
        return Ok(());
    }
    if let Err(err) = reviews.moderate(&admin, &interview.id, ModerationDecision::Rejected) {
        println!("  Moderation failed: {err}");
        return Ok(());
    }
    println!("- Moderation: {} approved, {} rejected", company.id.0, interview.id.0);

    let dashboard = match reviews.list_mine(&member.account) {
        Ok(rows) => rows,
        Err(err) => {
            println!("  Dashboard unavailable: {err}");
            return Ok(());
        }
    };
    for row in &dashboard {
        let action = if row.revisable { " (revise available)" } else { "" };
        println!("  - {} {} -> {}{}", row.kind, row.company_name, row.status, action);
    }

    if !args.skip_revision {
        let mut draft = interview_draft();
        draft.advice = Some("Added the detail moderation asked for".to_string());
        match reviews.revise(&member.account, &interview.id, ReviewDraft::Interview(draft)) {
            Ok(record) => println!(
                "- Revised {} back to {}",
                record.id.0,
                record.status.label()
            ),
            Err(err) => {
                println!("  Revision failed: {err}");
                return Ok(());
            }
        }
    }

    match reviews.list_public(&member.account) {
        Ok(listing) => {
            println!("- Public listing ({} approved)", listing.len());
            for entry in &listing {
                println!(
                    "  - [{}] {} rated {}/5",
                    entry.kind, entry.company_name, entry.headline_rating
                );
            }
        }
        Err(err) => println!("  Public listing unavailable: {err}"),
    }

    Ok(())
}

fn company_draft() -> CompanyReviewDraft {
    CompanyReviewDraft {
        company_name: Some("Haneul & Partners".to_string()),
        lawyer_type: Some("corporate".to_string()),
        employment_terms: Some("regular".to_string()),
        good_things: vec!["mentoring".to_string(), "caseload variety".to_string()],
        overall_rating: Some(4),
        work_life_balance: Some(3),
        salary_benefits: Some(4),
        career_growth: Some(5),
        culture_fit: Some(4),
        management: Some(3),
        pros: Some("Strong partner support".to_string()),
        overtime_frequency: Some("a few nights a month".to_string()),
        years_of_experience: Some("4".to_string()),
        salary: Some("98000000".to_string()),
        salary_type: Some("annual".to_string()),
        how_found: Some("colleague".to_string()),
        ..CompanyReviewDraft::default()
    }
}

fn interview_draft() -> InterviewReviewDraft {
    InterviewReviewDraft {
        company_name: Some("Haneul & Partners".to_string()),
        position: Some("Associate, M&A team".to_string()),
        interview_date: Some("2025-11-14".to_string()),
        interview_difficulty: Some(4),
        interview_experience: Some(3),
        interview_outcome: Some("accepted".to_string()),
        interview_process: Some("Two partner rounds and a written test".to_string()),
        lawyer_type: Some("corporate".to_string()),
        employment_terms: Some("regular".to_string()),
        ..InterviewReviewDraft::default()
    }
}
