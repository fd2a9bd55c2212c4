mod common;

use std::sync::Arc;

use spotproxy::{
    error::ProxyError,
    management::{InMemorySessionStore, SessionStore},
    types::Profile,
};

use common::token;

fn profile(user_id: &str) -> Profile {
    Profile {
        user_id: user_id.to_string(),
        display_name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        country: "SE".to_string(),
        product: "premium".to_string(),
        followers: 3,
        profile_url: format!("https://open.spotify.com/user/{}", user_id),
        image_url: String::new(),
    }
}

#[tokio::test]
async fn test_put_get_contains() {
    let store = InMemorySessionStore::new();
    assert!(!store.contains("s1").await);
    assert!(matches!(
        store.get("s1").await,
        Err(ProxyError::Unauthenticated(_))
    ));

    store.put("s1", token("a1", "r1")).await;
    assert!(store.contains("s1").await);
    assert_eq!(store.get("s1").await.unwrap().access_token, "a1");

    // put replaces, it never appends a second token
    store.put("s1", token("a2", "r2")).await;
    assert_eq!(store.get("s1").await.unwrap().access_token, "a2");
    assert_eq!(store.session_ids().await.len(), 1);
}

#[tokio::test]
async fn test_put_keeps_profile_of_existing_session() {
    let store = InMemorySessionStore::new();
    store.put("s1", token("a1", "r1")).await;
    store.set_profile("s1", profile("alice")).await.unwrap();

    store.put("s1", token("a2", "r2")).await;
    assert_eq!(store.session_for_user("alice").await.unwrap(), "s1");
    assert_eq!(
        store.profile("s1").await.unwrap().map(|p| p.user_id),
        Some("alice".to_string())
    );
}

#[tokio::test]
async fn test_session_for_user() {
    let store = InMemorySessionStore::new();
    store.put("s1", token("a1", "r1")).await;
    store.put("s2", token("a2", "r2")).await;

    // No profile recorded yet, so no user owns a session
    assert!(matches!(
        store.session_for_user("").await,
        Err(ProxyError::UnknownUser(_))
    ));

    store.set_profile("s2", profile("bob")).await.unwrap();
    assert_eq!(store.session_for_user("bob").await.unwrap(), "s2");
    assert!(matches!(
        store.session_for_user("alice").await,
        Err(ProxyError::UnknownUser(_))
    ));
}

#[tokio::test]
async fn test_set_profile_requires_session() {
    let store = InMemorySessionStore::new();
    assert!(matches!(
        store.set_profile("nope", profile("alice")).await,
        Err(ProxyError::Unauthenticated(_))
    ));
}

#[tokio::test]
async fn test_replace_token_is_conditional() {
    let store = InMemorySessionStore::new();
    let first = token("a1", "r1");
    store.put("s1", first.clone()).await;

    assert!(store.replace_token("s1", &first, token("a2", "r2")).await);
    assert_eq!(store.get("s1").await.unwrap().access_token, "a2");

    // `first` is no longer current: a late refresh must not win
    assert!(!store.replace_token("s1", &first, token("stale", "r1")).await);
    assert_eq!(store.get("s1").await.unwrap().access_token, "a2");

    // unknown sessions are never created by a replace
    assert!(!store.replace_token("s9", &first, token("a3", "r3")).await);
    assert!(!store.contains("s9").await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reads_never_see_torn_tokens() {
    let store = Arc::new(InMemorySessionStore::new());
    store.put("s1", token("access-0", "refresh-0")).await;

    let writer = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            for i in 1..=500 {
                let t = token(&format!("access-{}", i), &format!("refresh-{}", i));
                store.put("s1", t).await;
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for _ in 0..500 {
                    let t = store.get("s1").await.unwrap();
                    let a = t.access_token.trim_start_matches("access-");
                    let r = t.refresh_token.trim_start_matches("refresh-");
                    assert_eq!(a, r, "torn token: {:?}", t);
                }
            })
        })
        .collect();

    writer.await.unwrap();
    for r in readers {
        r.await.unwrap();
    }

    assert_eq!(store.get("s1").await.unwrap().access_token, "access-500");
}
