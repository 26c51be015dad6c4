//! End-to-end checks of the courier operations against a real SQLite store.
use courier_app::{
    AppError, authenticate, create_user, delete_user, list_messages, list_users, send_message,
};
use courier_crypto::HashParams;
use courier_db::{Database, DbConfig, DbError};

const CHEAP: HashParams = HashParams::new(8, 1, 1);

fn memory_db() -> Database {
    Database::open(&DbConfig::in_memory().with_hash_params(CHEAP)).unwrap()
}

fn count(db: &Database, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    db.with_conn(|conn| Ok(conn.query_row(&sql, [], |r| r.get(0))?))
        .unwrap()
}

#[test]
fn alice_sends_bob_a_message() {
    let db = memory_db();
    create_user(&db, "alice", "password1").unwrap();
    create_user(&db, "bob", "password2").unwrap();

    let alice = authenticate(&db, "alice", "password1").unwrap();
    send_message(&db, &alice, "bob", "hi").unwrap();

    let bob = authenticate(&db, "bob", "password2").unwrap();
    let received = db.messages().list_for_recipient(bob.id.unwrap()).unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].text, "hi");
    assert_eq!(received[0].from_id, alice.id.unwrap());

    let inbox = list_messages(&db, &bob).unwrap();
    assert_eq!(inbox[0].from_username, "alice");
}

#[test]
fn duplicate_username_fails_second_time() {
    let db = memory_db();
    for name in ["alice", "Bob", "名前"] {
        create_user(&db, name, "password1").unwrap();
        let err = create_user(&db, name, "password2").unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser(ref n) if n == name));
    }
    assert_eq!(count(&db, "users"), 3);
}

#[test]
fn short_passwords_never_reach_the_store() {
    let db = memory_db();
    for password in ["", "a", "1234567", "sevenzz"] {
        assert!(matches!(
            create_user(&db, "alice", password),
            Err(AppError::Validation(_))
        ));
    }
    assert_eq!(count(&db, "users"), 0);

    // Exactly eight is enough.
    create_user(&db, "alice", "12345678").unwrap();
}

#[test]
fn stored_credential_round_trips_without_plaintext() {
    let db = memory_db();
    create_user(&db, "alice", "correct horse").unwrap();

    let stored = db.users().find_by_username("alice").unwrap().unwrap();
    assert!(db.credentials().verify("correct horse", &stored.hashed_password));

    let leaked: i64 = db
        .with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM users WHERE instr(hashed_password, 'correct horse') > 0",
                [],
                |r| r.get(0),
            )?)
        })
        .unwrap();
    assert_eq!(leaked, 0);
}

#[test]
fn long_messages_are_rejected() {
    let db = memory_db();
    let alice = create_user(&db, "alice", "password1").unwrap();
    let bob = create_user(&db, "bob", "password2").unwrap();

    for len in [256, 300, 1000] {
        let text = "m".repeat(len);
        assert!(send_message(&db, &alice, "bob", &text).is_err());
        assert!(matches!(
            db.messages().send(alice.id.unwrap(), bob.id.unwrap(), &text),
            Err(DbError::MessageTooLong { .. })
        ));
    }
    assert_eq!(count(&db, "messages"), 0);

    send_message(&db, &alice, "bob", &"m".repeat(255)).unwrap();
    assert_eq!(count(&db, "messages"), 1);
}

#[test]
fn deleting_a_user_removes_their_messages() {
    let db = memory_db();
    let alice = create_user(&db, "alice", "password1").unwrap();
    let bob = create_user(&db, "bob", "password2").unwrap();
    send_message(&db, &alice, "bob", "hi bob").unwrap();
    send_message(&db, &bob, "alice", "hi alice").unwrap();

    let alice_id = alice.id.unwrap();
    delete_user(&db, "alice", "password1").unwrap();

    assert!(db.messages().list_for_recipient(alice_id).unwrap().is_empty());
    assert!(db.messages().list_from_sender(alice_id).unwrap().is_empty());
    assert!(db.users().find_by_id(alice_id).unwrap().is_none());
    assert!(list_messages(&db, &bob).unwrap().is_empty());
    assert_eq!(count(&db, "messages"), 0);
}

#[test]
fn authentication_failures_look_the_same() {
    let db = memory_db();
    create_user(&db, "alice", "password1").unwrap();

    let wrong_password = authenticate(&db, "alice", "password9").unwrap_err();
    let unknown_user = authenticate(&db, "carol", "password1").unwrap_err();

    assert!(matches!(wrong_password, AppError::AuthenticationFailed));
    assert!(matches!(unknown_user, AppError::AuthenticationFailed));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[test]
fn listings_are_repeatable() {
    let db = memory_db();
    let alice = create_user(&db, "alice", "password1").unwrap();
    create_user(&db, "bob", "password2").unwrap();
    send_message(&db, &alice, "bob", "one").unwrap();
    send_message(&db, &alice, "bob", "two").unwrap();

    assert_eq!(list_users(&db).unwrap(), list_users(&db).unwrap());
    assert_eq!(
        db.messages().list_all().unwrap(),
        db.messages().list_all().unwrap()
    );
}

#[test]
fn separate_connections_race_on_the_unique_index() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::file(dir.path().join("courier.db")).with_hash_params(CHEAP);

    let first = Database::open(&config).unwrap();
    let second = Database::open(&config).unwrap();

    create_user(&first, "alice", "password1").unwrap();
    assert!(matches!(
        create_user(&second, "alice", "password2"),
        Err(AppError::DuplicateUser(_))
    ));

    drop(first);
    assert!(authenticate(&second, "alice", "password1").is_ok());
}
