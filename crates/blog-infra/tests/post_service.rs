use std::sync::Arc;

use blog_core::domain::{Actor, PostInput};
use blog_core::{DomainError, PostService};
use blog_infra::InMemoryPostRepository;
use uuid::Uuid;

fn service() -> PostService {
    PostService::new(Arc::new(InMemoryPostRepository::new()))
}

fn user() -> Actor {
    Actor::new(Uuid::new_v4())
}

#[tokio::test]
async fn list_contains_every_created_title() {
    let posts = service();
    let author = user();
    for title in ["first", "second", "third"] {
        posts
            .create(Some(author), PostInput::new(title, "body"))
            .await
            .unwrap();
    }

    let titles: Vec<String> = posts.list().await.unwrap().into_iter().map(|p| p.title).collect();

    for title in ["first", "second", "third"] {
        assert!(titles.contains(&title.to_string()), "missing {title}");
    }
}

#[tokio::test]
async fn show_returns_title_and_desc() {
    let posts = service();
    let created = posts
        .create(Some(user()), PostInput::new("Hi", "World"))
        .await
        .unwrap();

    let shown = posts.show(created.id).await.unwrap();

    assert_eq!(shown.title, "Hi");
    assert_eq!(shown.desc, "World");
}

#[tokio::test]
async fn show_unknown_id_is_not_found() {
    let result = service().show(Uuid::new_v4()).await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn create_sets_owner_to_actor() {
    let posts = service();
    let author = user();

    let created = posts
        .create(Some(author), PostInput::new("Hi", "World"))
        .await
        .unwrap();

    assert_eq!(created.user_id, author.user_id);
}

#[tokio::test]
async fn unauthenticated_create_persists_nothing() {
    let posts = service();

    let result = posts.create(None, PostInput::new("Hi", "World")).await;

    assert!(matches!(result, Err(DomainError::Unauthenticated)));
    assert!(posts.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_requires_title() {
    let posts = service();
    let input = PostInput {
        title: None,
        desc: Some("World".to_string()),
    };

    let result = posts.create(Some(user()), input).await;

    match result {
        Err(DomainError::Validation(errors)) => assert!(errors.contains("title")),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(posts.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_requires_desc() {
    let posts = service();
    let input = PostInput {
        title: Some("Hi".to_string()),
        desc: None,
    };

    let result = posts.create(Some(user()), input).await;

    match result {
        Err(DomainError::Validation(errors)) => assert!(errors.contains("desc")),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(posts.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn owner_can_update() {
    let posts = service();
    let owner = user();
    let created = posts
        .create(Some(owner), PostInput::new("Hi", "World"))
        .await
        .unwrap();

    let updated = posts
        .update(Some(owner), created.id, PostInput::new("updated title", "World"))
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.user_id, owner.user_id);
    assert_eq!(posts.show(created.id).await.unwrap().title, "updated title");
}

#[tokio::test]
async fn non_owner_update_is_forbidden_and_row_unchanged() {
    let posts = service();
    let created = posts
        .create(Some(user()), PostInput::new("Hi", "World"))
        .await
        .unwrap();

    let result = posts
        .update(Some(user()), created.id, PostInput::new("hacked", "World"))
        .await;

    assert!(matches!(result, Err(DomainError::Forbidden)));
    let stored = posts.show(created.id).await.unwrap();
    assert_eq!(stored.title, "Hi");
    assert_eq!(stored.updated_at, created.updated_at);
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let result = service()
        .update(Some(user()), Uuid::new_v4(), PostInput::new("Hi", "World"))
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn update_validates_before_touching_the_row() {
    let posts = service();
    let owner = user();
    let created = posts
        .create(Some(owner), PostInput::new("Hi", "World"))
        .await
        .unwrap();

    let result = posts
        .update(Some(owner), created.id, PostInput::new("", "World"))
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(posts.show(created.id).await.unwrap().title, "Hi");
}

#[tokio::test]
async fn unauthenticated_update_and_delete_are_rejected() {
    let posts = service();
    let created = posts
        .create(Some(user()), PostInput::new("Hi", "World"))
        .await
        .unwrap();

    let update = posts
        .update(None, created.id, PostInput::new("nope", "World"))
        .await;
    let delete = posts.delete(None, created.id).await;

    assert!(matches!(update, Err(DomainError::Unauthenticated)));
    assert!(matches!(delete, Err(DomainError::Unauthenticated)));
    assert_eq!(posts.show(created.id).await.unwrap().title, "Hi");
}

#[tokio::test]
async fn owner_can_delete() {
    let posts = service();
    let owner = user();
    let created = posts
        .create(Some(owner), PostInput::new("Hi", "World"))
        .await
        .unwrap();

    posts.delete(Some(owner), created.id).await.unwrap();

    assert!(matches!(
        posts.show(created.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn non_owner_delete_is_forbidden_and_row_remains() {
    let posts = service();
    let created = posts
        .create(Some(user()), PostInput::new("Hi", "World"))
        .await
        .unwrap();

    let result = posts.delete(Some(user()), created.id).await;

    assert!(matches!(result, Err(DomainError::Forbidden)));
    assert!(posts.show(created.id).await.is_ok());
}
