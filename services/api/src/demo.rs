use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Local, Utc};
use clap::Args;
use merit_engine::error::AppError;
use merit_engine::workflows::recognition::{
    CriterionAssessment, EmployeeCategory, EmployeeId, EvaluationFlags,
    FinalEvaluationSubmission, LeaderboardEntry, PeerRating, Period, RaterId, RatingCriterion,
    RecognitionService, RecognitionServiceError, RecognitionStore, UnitEvaluationSubmission,
    WinnerDesignation, WinnerType,
};

use crate::infra::{
    default_recognition_config, sample_directory, InMemoryEmployeeDirectory,
    InMemoryRecognitionStore,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Rating period (YYYY-MM). Defaults to the current month.
    #[arg(long, value_parser = crate::infra::parse_period)]
    pub(crate) period: Option<Period>,
}

#[derive(Args, Debug)]
pub(crate) struct LeaderboardReportArgs {
    /// Rating period (YYYY-MM) for the monthly view. Defaults to the
    /// current month when --year is absent.
    #[arg(long, value_parser = crate::infra::parse_period)]
    pub(crate) period: Option<Period>,
    /// Switch to the yearly view for this calendar year
    #[arg(long, conflicts_with = "period")]
    pub(crate) year: Option<i32>,
    /// Restrict the preview to one category (defaults to both)
    #[arg(long, value_parser = crate::infra::parse_category)]
    pub(crate) category: Option<EmployeeCategory>,
}

type DemoService = RecognitionService<InMemoryRecognitionStore, InMemoryEmployeeDirectory>;

fn current_period() -> Period {
    let today = Local::now().date_naive();
    Period::new(today.year(), today.month()).expect("calendar month is in range")
}

fn sample_rating(rater: &str, subject: &str, period: Period, total: u8) -> PeerRating {
    let criteria = RatingCriterion::ALL;
    let per = total / criteria.len() as u8;
    let remainder = total % criteria.len() as u8;

    let mut scores = BTreeMap::new();
    for (index, criterion) in criteria.iter().enumerate() {
        let extra = if (index as u8) < remainder { 1 } else { 0 };
        scores.insert(*criterion, per + extra);
    }

    PeerRating::new(
        RaterId(rater.to_string()),
        EmployeeId(subject.to_string()),
        period,
        scores,
        format!("peer rating from {rater}"),
        Utc::now(),
    )
}

fn seeded_service(period: Period) -> Result<DemoService, AppError> {
    let store = Arc::new(InMemoryRecognitionStore::default());
    let directory = Arc::new(sample_directory());

    let seeds: &[(&str, &[u8])] = &[
        ("emp-andi", &[80, 90, 100]),
        ("emp-budi", &[70, 75]),
        ("emp-citra", &[88]),
        ("emp-dewi", &[95, 90]),
        ("emp-eka", &[60]),
    ];
    for (subject, totals) in seeds {
        for (index, total) in totals.iter().enumerate() {
            store
                .insert_rating(sample_rating(
                    &format!("rater-{index}"),
                    subject,
                    period,
                    *total,
                ))
                .map_err(RecognitionServiceError::Store)?;
        }
    }

    let service = RecognitionService::new(store, directory, default_recognition_config());
    Ok(service)
}

pub(crate) fn run_leaderboard_report(args: LeaderboardReportArgs) -> Result<(), AppError> {
    let LeaderboardReportArgs {
        period,
        year,
        category,
    } = args;

    let period = match (period, year) {
        (Some(period), _) => period,
        (None, Some(year)) => Period::new(year, 1).expect("calendar month is in range"),
        (None, None) => current_period(),
    };
    let service = seeded_service(period)?;

    let categories: Vec<EmployeeCategory> = match category {
        Some(category) => vec![category],
        None => vec![EmployeeCategory::Asn, EmployeeCategory::NonAsn],
    };

    match year {
        Some(year) => {
            println!("Yearly leaderboard preview for {year} (sample dataset)");
            for category in categories {
                let entries = service.yearly_leaderboard(year, category)?;
                render_leaderboard(category, &entries);
            }
        }
        None => {
            println!(
                "Monthly leaderboard preview for {} / {} (sample dataset)",
                period,
                period.long_label()
            );
            for category in categories {
                let entries = service.monthly_leaderboard(period, category)?;
                render_leaderboard(category, &entries);
            }
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let period = args.period.unwrap_or_else(current_period);

    println!("Employee recognition demo");
    println!("Rating period: {} ({})", period, period.long_label());

    let service = seeded_service(period)?;

    println!("\nUnit override for emp-andi");
    let unit = service.submit_unit_evaluation(UnitEvaluationSubmission {
        subject_id: EmployeeId("emp-andi".to_string()),
        period,
        flags: EvaluationFlags {
            disciplinary_action: CriterionAssessment::with_evidence(
                "Written warning issued in this period",
                "docs://hr/warning-041",
            ),
            poor_attendance: CriterionAssessment::flagged("Seven late arrivals"),
            positive_contribution: CriterionAssessment::flagged("Led the service desk revamp"),
            ..EvaluationFlags::default()
        },
        evaluated_by: EmployeeId("sup-yusuf".to_string()),
    })?;
    println!(
        "- base {} | penalties {} | bonus {} | final {}",
        unit.base_score,
        unit.breakdown.total_penalties(),
        unit.breakdown.total_bonuses(),
        unit.final_score()
    );

    println!("\nCentral override for emp-andi");
    let central = service.submit_final_evaluation(FinalEvaluationSubmission {
        subject_id: EmployeeId("emp-andi".to_string()),
        period,
        flags: EvaluationFlags::default(),
        verified: Default::default(),
        additional_adjustment: 5,
        adjustment_note: "Provincial service award".to_string(),
        evaluated_by: EmployeeId("adm-ratna".to_string()),
    })?;
    println!(
        "- base {} | unit snapshot {:?} | adjustment {:+} | final {}",
        central.base_score,
        central.unit_score_snapshot,
        central.additional_adjustment,
        central.final_score()
    );

    println!("\nMonthly leaderboards");
    for category in [EmployeeCategory::Asn, EmployeeCategory::NonAsn] {
        let entries = service.monthly_leaderboard(period, category)?;
        render_leaderboard(category, &entries);
    }

    let asn_entries = service.monthly_leaderboard(period, EmployeeCategory::Asn)?;
    if let Some(leader) = asn_entries.first() {
        println!("\nDesignating the ASN leader as winner");
        let winner = service.designate_winner(WinnerDesignation {
            winner_type: WinnerType::Monthly,
            category: EmployeeCategory::Asn,
            period,
            subject_id: leader.subject_id.clone(),
            final_points: leader.score,
            designated_by: EmployeeId("adm-ratna".to_string()),
        })?;
        println!(
            "- {} confirmed for {} with {} points ({})",
            winner.subject_id,
            winner.period.long_label(),
            winner.final_points,
            winner.id
        );

        let recap = service.winner_recap(WinnerType::Monthly, period.year())?;
        println!("\nWinner recap for {}", period.year());
        for entry in recap {
            println!(
                "- {} | {} | {} | {} points",
                entry.period,
                entry.category.label(),
                entry.subject_id,
                entry.final_points
            );
        }
    }

    println!("\nAudit breakdown for emp-andi");
    let breakdown = service.score_breakdown(&EmployeeId("emp-andi".to_string()), period)?;
    println!(
        "- {} ratings | peer total {} | peer average {:?}",
        breakdown.rating_count, breakdown.peer_total, breakdown.peer_average
    );
    if let Some(unit) = &breakdown.unit {
        println!("- unit tier: {}", unit.final_score());
    }
    if let Some(central) = &breakdown.final_evaluation {
        println!("- final tier: {}", central.final_score());
    }
    if let Some(resolved) = breakdown.resolved {
        println!(
            "- resolved: {} (tier {})",
            resolved.score,
            resolved.source_tier.label()
        );
    }

    Ok(())
}

fn render_leaderboard(category: EmployeeCategory, entries: &[LeaderboardEntry]) {
    println!("\n{} standings", category.label());
    if entries.is_empty() {
        println!("- no rated subjects");
        return;
    }

    for entry in entries {
        println!(
            "{:>2}. {} | {} points | {} rating(s)",
            entry.rank, entry.subject_id, entry.score, entry.rating_count
        );
    }
}
