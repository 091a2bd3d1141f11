//! Integration tests for namespace creation and navigation through the
//! dispatcher

mod common;

use ::common::proto::{ParentAtRoot, Policy};

#[tokio::test]
async fn test_mkdir_then_cd() {
    let (dispatcher, _) = common::setup_dispatcher(Policy::default());
    let mut session = dispatcher.open_session();

    assert_eq!(common::send(&dispatcher, &mut session, "mkdir hi").await, "OK");
    assert_eq!(
        common::send(&dispatcher, &mut session, "mkdir hi").await,
        "ERROR exists"
    );
    assert_eq!(common::send(&dispatcher, &mut session, "cd hi").await, "OK");
    assert_eq!(
        common::send(&dispatcher, &mut session, "pwd").await,
        "OK /hi"
    );
}

#[tokio::test]
async fn test_depth_chain_of_25() {
    // 25 rounds of `mkdir hi` + `cd hi` leave the session 25 levels deep,
    // every node a fresh child of the previous one, every step OK.
    let (dispatcher, _) = common::setup_dispatcher(Policy::default());
    let mut session = dispatcher.open_session();

    for _ in 0..25 {
        assert_eq!(common::send(&dispatcher, &mut session, "mkdir hi").await, "OK");
        assert_eq!(common::send(&dispatcher, &mut session, "cd hi ").await, "OK");
    }

    let expected = format!("/{}", vec!["hi"; 25].join("/"));
    assert_eq!(
        common::send(&dispatcher, &mut session, "pwd").await,
        format!("OK {expected}")
    );

    // Walk back up to the root, one parent at a time.
    for _ in 0..25 {
        assert_eq!(common::send(&dispatcher, &mut session, "cd ..").await, "OK");
    }
    assert_eq!(common::send(&dispatcher, &mut session, "pwd").await, "OK /");
}

#[tokio::test]
async fn test_siblings_under_shared_namespace() {
    // Two sessions see each other's directories: the tree is shared.
    let (dispatcher, _) = common::setup_dispatcher(Policy::default());
    let mut first = dispatcher.open_session();
    let mut second = dispatcher.open_session();

    assert_eq!(common::send(&dispatcher, &mut first, "mkdir shared").await, "OK");
    assert_eq!(
        common::send(&dispatcher, &mut second, "mkdir shared").await,
        "ERROR exists"
    );
    assert_eq!(common::send(&dispatcher, &mut second, "cd shared").await, "OK");
}

#[tokio::test]
async fn test_concurrent_mkdir_same_name_single_winner() {
    let (dispatcher, _) = common::setup_dispatcher(Policy::default());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let mut session = dispatcher.open_session();
                common::send(&dispatcher, &mut session, "mkdir race").await
            })
        })
        .collect();

    let mut ok = 0;
    let mut exists = 0;
    for handle in handles {
        match handle.await.unwrap().as_str() {
            "OK" => ok += 1,
            "ERROR exists" => exists += 1,
            other => panic!("unexpected response: {other}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(exists, 7);
}

#[tokio::test]
async fn test_parent_at_root_both_policies() {
    let (stay, _) = common::setup_dispatcher(Policy::default());
    let mut session = stay.open_session();
    assert_eq!(common::send(&stay, &mut session, "cd ..").await, "OK");
    assert_eq!(common::send(&stay, &mut session, "pwd").await, "OK /");

    let (deny, _) = common::setup_dispatcher(Policy {
        parent_at_root: ParentAtRoot::Deny,
        ..Policy::default()
    });
    let mut session = deny.open_session();
    assert_eq!(
        common::send(&deny, &mut session, "cd ..").await,
        "ERROR not found"
    );
}
