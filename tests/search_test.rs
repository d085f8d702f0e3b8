mod helpers;

use agary::contacts::{search, store, ContactPatch};
use helpers::*;

#[test]
fn vector_search_ranks_by_cosine_and_stays_per_user() {
    let db = test_db();
    let owner = create_user(&db, "owner");
    let other = create_user(&db, "other");
    let ada = insert_contact(&db, &owner.user.id, "Ada", "Lovelace", None, None);
    let grace = insert_contact(&db, &owner.user.id, "Grace", "Hopper", None, None);
    let stranger = insert_contact(&db, &other.user.id, "Alan", "Turing", None, None);

    let conn = db.lock().unwrap();
    search::store_embedding(&conn, &ada.id, &spike_embedding(1)).unwrap();
    search::store_embedding(&conn, &grace.id, &spike_embedding(2)).unwrap();
    search::store_embedding(&conn, &stranger.id, &spike_embedding(1)).unwrap();

    let hits = search::vector_search(&conn, &owner.user.id, &spike_embedding(1), 5).unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.contact.id.as_str()).collect();
    assert_eq!(ids, vec![ada.id.as_str(), grace.id.as_str()]);
    assert!((hits[0].similarity.unwrap() - 1.0).abs() < 1e-6);
    assert!(hits[1].similarity.unwrap().abs() < 1e-6);

    let top = search::vector_search(&conn, &owner.user.id, &spike_embedding(2), 1).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].contact.id, grace.id);
}

#[test]
fn wrong_dimension_embeddings_are_rejected() {
    let db = test_db();
    let owner = create_user(&db, "owner");
    let ada = insert_contact(&db, &owner.user.id, "Ada", "Lovelace", None, None);

    let conn = db.lock().unwrap();
    assert!(search::store_embedding(&conn, &ada.id, &[1.0, 0.0, 0.0]).is_err());
    assert!(!search::user_has_embeddings(&conn, &owner.user.id).unwrap());
}

#[test]
fn identity_edits_and_deletes_drop_embeddings() {
    let db = test_db();
    let owner = create_user(&db, "owner");
    let ada = insert_contact(&db, &owner.user.id, "Ada", "Lovelace", None, None);
    let grace = insert_contact(&db, &owner.user.id, "Grace", "Hopper", None, None);

    let mut conn = db.lock().unwrap();
    search::store_embedding(&conn, &ada.id, &spike_embedding(1)).unwrap();
    search::store_embedding(&conn, &grace.id, &spike_embedding(2)).unwrap();

    let cosmetic = ContactPatch {
        other_links: Some("Blog: https://ada.dev".into()),
        ..Default::default()
    };
    store::update_contact(&mut conn, &owner.user.id, &ada.id, &cosmetic).unwrap();
    assert_eq!(search::count_missing_embeddings(&conn).unwrap(), 0);

    let identity = ContactPatch {
        company: Some("Analytical Engines".into()),
        ..Default::default()
    };
    store::update_contact(&mut conn, &owner.user.id, &ada.id, &identity).unwrap();
    let missing = search::contacts_missing_embeddings(&conn, Some(&owner.user.id), 10).unwrap();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].id, ada.id);

    assert!(store::delete_contact(&mut conn, &owner.user.id, &grace.id).unwrap());
    assert!(!search::user_has_embeddings(&conn, &owner.user.id).unwrap());
}

#[test]
fn keyword_search_matches_any_token_in_names_company_or_notes() {
    let db = test_db();
    let owner = create_user(&db, "owner");
    insert_contact(&db, &owner.user.id, "Ada", "Lovelace", Some("Analytical Engines"), None);
    insert_contact(&db, &owner.user.id, "Grace", "Hopper", Some("US Navy"), None);
    insert_contact(&db, &owner.user.id, "Alan", "Turing", Some("Bletchley"), None);

    let conn = db.lock().unwrap();
    let hits = search::keyword_search(&conn, &owner.user.id, "who knows engines or the navy?", 10).unwrap();
    let mut names: Vec<String> = hits.iter().map(|c| c.full_name()).collect();
    names.sort();
    assert_eq!(names, vec!["Ada Lovelace", "Grace Hopper"]);

    assert!(search::keyword_search(&conn, &owner.user.id, "  ", 10).unwrap().is_empty());
}
