use memberbase_core::db::open_db_in_memory;
use memberbase_core::{
    EntityCollection, EntityKind, LifecycleCollection, MemberTypeFilter, MemberTypeId,
    MemberTypePatch, NewPost, NewProfile, NewUser, PostFilter, PostPatch, ProfileFilter,
    ProfilePatch, RepoError, SqliteMemberTypeCollection, SqlitePostCollection,
    SqliteProfileCollection, SqliteUserCollection, UserFilter, UserPatch, ValidationError,
};
use uuid::Uuid;

fn new_user(first_name: &str) -> NewUser {
    NewUser {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
    }
}

fn new_profile(user_id: Uuid) -> NewProfile {
    NewProfile {
        avatar: "avatar.png".to_string(),
        sex: "f".to_string(),
        birthday: 946_684_800_000,
        country: "NL".to_string(),
        street: "Main 1".to_string(),
        city: "Utrecht".to_string(),
        member_type_id: MemberTypeId::Basic,
        user_id,
    }
}

#[test]
fn create_assigns_fresh_ids_and_find_one_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);

    let ada = users.create(&new_user("Ada")).unwrap();
    let bob = users.create(&new_user("Bob")).unwrap();
    assert_ne!(ada.id, bob.id);
    assert!(ada.subscribed_to_user_ids.is_empty());

    let loaded = users.find_one(&UserFilter::Id(ada.id)).unwrap().unwrap();
    assert_eq!(loaded, ada);
}

#[test]
fn find_many_without_filter_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);

    let names = ["Cleo", "Abe", "Bea", "Dan"];
    let created: Vec<_> = names
        .iter()
        .map(|name| users.create(&new_user(name)).unwrap().id)
        .collect();

    let listed: Vec<_> = users
        .find_many(None)
        .unwrap()
        .into_iter()
        .map(|user| user.id)
        .collect();
    assert_eq!(listed, created);
}

#[test]
fn find_one_reports_absence_without_error() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);

    assert!(users
        .find_one(&UserFilter::Id(Uuid::new_v4()))
        .unwrap()
        .is_none());
    assert!(users.find_many(Some(&UserFilter::Email("nobody@example.com".to_string())))
        .unwrap()
        .is_empty());
}

#[test]
fn equality_filter_on_email() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);
    users.create(&new_user("Ada")).unwrap();
    let bob = users.create(&new_user("Bob")).unwrap();

    let found = users
        .find_many(Some(&UserFilter::Email("bob@example.com".to_string())))
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, bob.id);
}

#[test]
fn set_membership_filter_finds_followers() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);
    let star = users.create(&new_user("Star")).unwrap();
    let fan_a = users.create(&new_user("FanA")).unwrap();
    let other = users.create(&new_user("Other")).unwrap();
    let fan_b = users.create(&new_user("FanB")).unwrap();

    for fan in [&fan_a, &fan_b] {
        users
            .change(
                fan.id,
                &UserPatch {
                    subscribed_to_user_ids: Some(vec![star.id]),
                    ..UserPatch::default()
                },
            )
            .unwrap();
    }
    users
        .change(
            other.id,
            &UserPatch {
                subscribed_to_user_ids: Some(vec![fan_a.id]),
                ..UserPatch::default()
            },
        )
        .unwrap();

    let followers: Vec<_> = users
        .find_many(Some(&UserFilter::SubscribedTo(star.id)))
        .unwrap()
        .into_iter()
        .map(|user| user.id)
        .collect();
    assert_eq!(followers, vec![fan_a.id, fan_b.id]);
}

#[test]
fn change_merges_patch_and_preserves_follow_order() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);
    let ada = users.create(&new_user("Ada")).unwrap();
    let targets: Vec<_> = ["Zed", "Amy", "Max"]
        .iter()
        .map(|name| users.create(&new_user(name)).unwrap().id)
        .collect();

    let updated = users
        .change(
            ada.id,
            &UserPatch {
                last_name: Some("Byron".to_string()),
                subscribed_to_user_ids: Some(targets.clone()),
                ..UserPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.first_name, "Ada");
    assert_eq!(updated.last_name, "Byron");
    assert_eq!(updated.subscribed_to_user_ids, targets);

    let renamed = users
        .change(
            ada.id,
            &UserPatch {
                first_name: Some("Augusta".to_string()),
                ..UserPatch::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.subscribed_to_user_ids, targets);
}

#[test]
fn change_and_delete_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);
    let posts = SqlitePostCollection::new(&conn);
    let missing = Uuid::new_v4();

    let err = users.change(missing, &UserPatch::default()).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound { kind: EntityKind::User, ref id } if *id == missing.to_string()
    ));
    let err = posts.delete(missing).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            kind: EntityKind::Post,
            ..
        }
    ));
}

#[test]
fn change_rejects_self_subscription_and_leaves_record_untouched() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);
    let ada = users.create(&new_user("Ada")).unwrap();

    let err = users
        .change(
            ada.id,
            &UserPatch {
                email: Some("changed@example.com".to_string()),
                subscribed_to_user_ids: Some(vec![ada.id]),
                ..UserPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::SelfSubscription { .. })
    ));

    let stored = users.find_one(&UserFilter::Id(ada.id)).unwrap().unwrap();
    assert_eq!(stored, ada);
}

#[test]
fn change_to_unknown_target_is_refused_atomically() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);
    let ada = users.create(&new_user("Ada")).unwrap();
    let bob = users.create(&new_user("Bob")).unwrap();
    users
        .change(
            ada.id,
            &UserPatch {
                subscribed_to_user_ids: Some(vec![bob.id]),
                ..UserPatch::default()
            },
        )
        .unwrap();

    let err = users
        .change(
            ada.id,
            &UserPatch {
                first_name: Some("Changed".to_string()),
                subscribed_to_user_ids: Some(vec![bob.id, Uuid::new_v4()]),
                ..UserPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Constraint(_)));

    let stored = users.find_one(&UserFilter::Id(ada.id)).unwrap().unwrap();
    assert_eq!(stored.first_name, "Ada");
    assert_eq!(stored.subscribed_to_user_ids, vec![bob.id]);
}

#[test]
fn delete_returns_snapshot_and_removes_record() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);
    let ada = users.create(&new_user("Ada")).unwrap();
    let bob = users.create(&new_user("Bob")).unwrap();
    users
        .change(
            ada.id,
            &UserPatch {
                subscribed_to_user_ids: Some(vec![bob.id]),
                ..UserPatch::default()
            },
        )
        .unwrap();

    let removed = users.delete(ada.id).unwrap();
    assert_eq!(removed.subscribed_to_user_ids, vec![bob.id]);
    assert!(users.find_one(&UserFilter::Id(ada.id)).unwrap().is_none());

    let edges: i64 = conn
        .query_row("SELECT COUNT(*) FROM user_subscriptions;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(edges, 0);
}

#[test]
fn plain_user_delete_is_refused_while_dependents_exist() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);
    let posts = SqlitePostCollection::new(&conn);
    let ada = users.create(&new_user("Ada")).unwrap();
    let fan = users.create(&new_user("Fan")).unwrap();
    users
        .change(
            fan.id,
            &UserPatch {
                subscribed_to_user_ids: Some(vec![ada.id]),
                ..UserPatch::default()
            },
        )
        .unwrap();

    let err = users.delete(ada.id).unwrap_err();
    assert!(matches!(err, RepoError::Constraint(_)));

    let solo = users.create(&new_user("Solo")).unwrap();
    posts
        .create(&NewPost {
            title: "hello".to_string(),
            content: "world".to_string(),
            user_id: solo.id,
        })
        .unwrap();
    assert!(matches!(
        users.delete(solo.id).unwrap_err(),
        RepoError::Constraint(_)
    ));
    assert!(users.find_one(&UserFilter::Id(solo.id)).unwrap().is_some());
}

#[test]
fn post_collection_crud_and_owner_filter() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);
    let posts = SqlitePostCollection::new(&conn);
    let ada = users.create(&new_user("Ada")).unwrap();
    let bob = users.create(&new_user("Bob")).unwrap();

    let first = posts
        .create(&NewPost {
            title: "one".to_string(),
            content: "first".to_string(),
            user_id: ada.id,
        })
        .unwrap();
    posts
        .create(&NewPost {
            title: "two".to_string(),
            content: "second".to_string(),
            user_id: bob.id,
        })
        .unwrap();

    let changed = posts
        .change(
            first.id,
            &PostPatch {
                content: Some("edited".to_string()),
                ..PostPatch::default()
            },
        )
        .unwrap();
    assert_eq!(changed.title, "one");
    assert_eq!(changed.content, "edited");

    let owned = posts.find_many(Some(&PostFilter::UserId(ada.id))).unwrap();
    assert_eq!(owned, vec![changed.clone()]);

    assert_eq!(posts.delete(first.id).unwrap(), changed);
    assert!(posts.find_many(Some(&PostFilter::UserId(ada.id))).unwrap().is_empty());
    assert_eq!(posts.find_many(None).unwrap().len(), 1);
}

#[test]
fn profile_collection_filters_by_owner_and_member_type() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserCollection::new(&conn);
    let profiles = SqliteProfileCollection::new(&conn);
    let ada = users.create(&new_user("Ada")).unwrap();
    let bob = users.create(&new_user("Bob")).unwrap();

    let ada_profile = profiles.create(&new_profile(ada.id)).unwrap();
    let bob_profile = profiles.create(&new_profile(bob.id)).unwrap();
    let upgraded = profiles
        .change(
            bob_profile.id,
            &ProfilePatch {
                member_type_id: Some(MemberTypeId::Business),
                city: Some("Delft".to_string()),
                ..ProfilePatch::default()
            },
        )
        .unwrap();
    assert_eq!(upgraded.user_id, bob.id);
    assert_eq!(upgraded.city, "Delft");

    let basic = profiles
        .find_many(Some(&ProfileFilter::MemberTypeId(MemberTypeId::Basic)))
        .unwrap();
    assert_eq!(basic, vec![ada_profile.clone()]);
    let owned = profiles
        .find_one(&ProfileFilter::UserId(bob.id))
        .unwrap()
        .unwrap();
    assert_eq!(owned, upgraded);
}

#[test]
fn member_type_collection_reads_and_patches() {
    let conn = open_db_in_memory().unwrap();
    let member_types = SqliteMemberTypeCollection::new(&conn);

    let ids: Vec<_> = member_types
        .find_many(None)
        .unwrap()
        .into_iter()
        .map(|member_type| member_type.id)
        .collect();
    assert_eq!(ids, vec![MemberTypeId::Basic, MemberTypeId::Business]);

    let patched = member_types
        .change(
            MemberTypeId::Business,
            &MemberTypePatch {
                discount: Some(12.5),
                ..MemberTypePatch::default()
            },
        )
        .unwrap();
    assert_eq!(patched.discount, 12.5);
    assert_eq!(patched.month_posts_limit, 100);

    let reloaded = member_types
        .find_one(&MemberTypeFilter::Id(MemberTypeId::Business))
        .unwrap()
        .unwrap();
    assert_eq!(reloaded, patched);

    let err = member_types
        .change(
            MemberTypeId::Basic,
            &MemberTypePatch {
                month_posts_limit: Some(-3),
                ..MemberTypePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}
