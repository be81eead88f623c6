#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use caller_context::{
    AuthenticatedPrincipal, CallerContext, CallerIdentity, SystemPrincipal, User,
};
use uuid::Uuid;

fn user(name: &str) -> CallerIdentity {
    CallerIdentity::User(AuthenticatedPrincipal::new(
        User::builder(name).id(Uuid::nil()).build(),
        vec!["ROLE_USER".into()],
    ))
}

fn system() -> CallerIdentity {
    CallerIdentity::System(SystemPrincipal::new("platform", Uuid::nil()))
}

#[tokio::test]
async fn guard_restores_when_future_is_cancelled() {
    let ctx = CallerContext::with_caller(user("carol"));

    let slow = async {
        let _guard = ctx.impersonate(system());
        tokio::time::sleep(Duration::from_secs(60)).await;
    };
    let outcome = tokio::time::timeout(Duration::from_millis(20), slow).await;

    assert!(outcome.is_err(), "the slow lookup should have timed out");
    assert_eq!(ctx.get(), Some(user("carol")));
}

#[tokio::test]
async fn guard_restores_across_await_points() {
    let ctx = CallerContext::new();
    {
        let _guard = ctx.impersonate(system());
        tokio::task::yield_now().await;
        assert!(ctx.get().is_some_and(|c| c.is_system()));
    }
    assert!(ctx.get().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn contexts_are_isolated_between_tasks() {
    let mut handles = Vec::new();
    for i in 0..16 {
        handles.push(tokio::spawn(async move {
            let name = format!("user-{i}");
            let ctx = CallerContext::with_caller(user(&name));
            for _ in 0..10 {
                let _guard = ctx.impersonate(system());
                tokio::task::yield_now().await;
                assert!(ctx.get().is_some_and(|c| c.is_system()));
            }
            ctx.get()
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let restored = handle.await.unwrap();
        assert_eq!(restored, Some(user(&format!("user-{i}"))));
    }
}
