//! Runs the search pipeline (filter, summarise, sort, page) over a large
//! synthetic tender list.

#![allow(missing_docs)]

use std::num::NonZeroUsize;

use chrono::{Days, NaiveDate};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tenders_core::{
    engine::{SortConfig, SortDirection, SortKey},
    Category, FilterCriteria, FundingType, SearchSession, Tender,
};

fn synthetic_tenders(count: u32) -> Vec<Tender> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (1..=count)
        .map(|id| {
            let category = Category::ALL[id as usize % Category::ALL.len()];
            let funding_type = FundingType::ALL[id as usize % FundingType::ALL.len()];
            Tender {
                id,
                title: format!("Razpis {id} za {category}"),
                summary: "Podpora za razvoj in inovacije".to_string(),
                institution: format!("Institucija {}", id % 7),
                funding_min: u64::from(id) * 1_000,
                funding_max: u64::from(id) * 10_000,
                deadline: start.checked_add_days(Days::new(u64::from(id % 365))),
                funding_type,
                eligible_entities: vec!["MSP".to_string(), "Startupi".to_string()],
                category,
                full_description: String::new(),
                conclusion_points: Vec::new(),
            }
        })
        .collect()
}

fn pipeline(c: &mut Criterion) {
    let tenders = synthetic_tenders(10_000);
    let mut session = SearchSession::new(NonZeroUsize::new(25).unwrap());
    *session.draft_mut() = FilterCriteria {
        keyword: "razvoj".to_string(),
        category: Some(Category::GreenTransition),
        ..FilterCriteria::default()
    };
    session.commit();
    session.set_sort(SortConfig {
        key: SortKey::FundingMax,
        direction: SortDirection::Desc,
    });

    c.bench_function("search pipeline", |b| {
        b.iter_batched(
            || session.clone(),
            |session| session.results(&tenders).summary,
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, pipeline);
criterion_main!(benches);
