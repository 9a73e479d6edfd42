use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use service::user_record::domain::CreateUserInput;
use service::user_record::repository::mock::MockUserRecordRepository;
use service::UserRecordService;

fn company(seq: u64) -> CreateUserInput {
    CreateUserInput {
        company_name: format!("Bench {seq}"),
        role: "DISTRIBUTOR".into(),
        inn: format!("inn{seq}"),
        bik: format!("bik{seq}"),
        kpp: format!("kpp{seq}"),
        payment_account: format!("acc{seq}"),
        legal_address: "Kazan".into(),
        country: None,
        contact_number: format!("+7{seq}"),
    }
}

fn bench_create(c: &mut Criterion) {
    let svc = UserRecordService::new(Arc::new(MockUserRecordRepository::default()));
    let rt = tokio::runtime::Runtime::new().unwrap();
    let seq = AtomicU64::new(0);

    c.bench_function("user_record_create", |b| {
        b.iter(|| {
            let n = seq.fetch_add(1, Ordering::Relaxed);
            rt.block_on(svc.create(company(n))).unwrap();
        });
    });

    // every identifier of this record is already taken
    let taken = company(0);
    c.bench_function("user_record_create_conflict", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.create(taken.clone())).unwrap_err();
        });
    });
}

criterion_group!(benches, bench_create);
criterion_main!(benches);
