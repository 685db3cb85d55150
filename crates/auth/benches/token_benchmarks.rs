use criterion::{Criterion, black_box, criterion_group, criterion_main};

use estate_auth::{Role, TokenService};
use estate_core::UserId;

fn token_issue(c: &mut Criterion) {
    let svc = TokenService::new(b"bench-secret");
    let sub = UserId::new();
    c.bench_function("token_issue", |b| {
        b.iter(|| svc.issue(black_box(sub), Role::Moderator))
    });
}

fn token_verify(c: &mut Criterion) {
    let svc = TokenService::new(b"bench-secret");
    let token = svc
        .issue(UserId::new(), Role::Client)
        .expect("issue token");
    c.bench_function("token_verify", |b| b.iter(|| svc.verify(black_box(&token))));
}

criterion_group!(benches, token_issue, token_verify);
criterion_main!(benches);
