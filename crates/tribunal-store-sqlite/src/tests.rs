//! Integration tests for `SqliteStore` against an in-memory database, and
//! for `Justice` running on top of it.

use std::{collections::BTreeSet, sync::Arc};

use tribunal_core::{
  Error as CoreError, ErrorKind,
  access::{Caller, Operation, Role, RolePolicy},
  case::{CaseDraft, CaseStatus, CaseTransition},
  dossier::{BankSummary, Enrichment},
  hearing::{AppealDraft, HearingDraft},
  party::{Party, PartySpec},
  person::{BankAccount, MedicalRecord, Person, PersonId},
  service::Justice,
  store::{BankLedger, CaseStore, MedicalRegistry, PersonDirectory},
};
use uuid::Uuid;

use crate::{DirectoryFixture, Error, SqliteStore};

const INVESTIGATOR: PersonId = 42;
const SUSPECT: PersonId = 7;
const JOKER: PersonId = 9;

fn person(person_id: PersonId, name: &str, rights: &[&str]) -> Person {
  Person {
    person_id,
    name: name.into(),
    rights: rights.iter().map(|r| r.to_string()).collect(),
    health_status: String::new(),
    balance: 0,
    registration_place: "Central district".into(),
  }
}

fn fixture() -> DirectoryFixture {
  DirectoryFixture {
    persons:         vec![
      person(INVESTIGATOR, "Inspector Lestrade", &["police"]),
      person(SUSPECT, "John Smith", &[]),
      person(JOKER, "Jester", &["joker"]),
    ],
    bank_accounts:   vec![BankAccount {
      account_id: 1001,
      person_id:  Some(SUSPECT),
      balance:    12_500,
    }],
    medical_records: vec![MedicalRecord {
      record_id:     501,
      person_id:     Some(SUSPECT),
      health_status: "healthy".into(),
    }],
  }
}

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  s.seed(fixture()).await.expect("seed directory");
  s
}

type SqliteJustice = Justice<SqliteStore, SqliteStore, SqliteStore>;

fn justice(s: &SqliteStore) -> SqliteJustice {
  Justice::new(
    Arc::new(s.clone()),
    Arc::new(s.clone()),
    Arc::new(s.clone()),
    Arc::new(RolePolicy::default()),
  )
}

fn police() -> Caller { Caller::new(Some(INVESTIGATOR), [Role::Police]) }

fn court() -> Caller { Caller::new(None, [Role::Court]) }

fn draft() -> CaseDraft {
  CaseDraft {
    complainant:  PartySpec::named("Jane Doe"),
    suspect:      PartySpec::person(SUSPECT),
    statement:    "Bicycle stolen from the market square".into(),
    article:      "158".into(),
    evidence_url: None,
  }
}

fn hearing_draft(case_id: Uuid, verdict: &str) -> HearingDraft {
  HearingDraft {
    case_id,
    plaintiff: PartySpec::city(),
    protocol: "Witnesses heard".into(),
    verdict: verdict.into(),
  }
}

fn appeal(verdict: &str) -> AppealDraft {
  AppealDraft { protocol: "Retrial".into(), verdict: verdict.into() }
}

fn is_invalid_state(err: &CoreError) -> bool {
  err.kind() == ErrorKind::InvalidState
}

// ─── Directory ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn seeded_person_round_trips() {
  let s = store().await;

  let found = s.find_person(INVESTIGATOR).await.unwrap().unwrap();
  assert_eq!(found.name, "Inspector Lestrade");
  assert_eq!(found.rights, vec!["police".to_string()]);
  assert!(s.person_exists(SUSPECT).await.unwrap());
  assert!(!s.person_exists(1234).await.unwrap());
  assert!(s.find_person(1234).await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_person_replaces_existing_row() {
  let s = store().await;
  s.upsert_person(person(SUSPECT, "John Q. Smith", &["court"]))
    .await
    .unwrap();

  let found = s.find_person(SUSPECT).await.unwrap().unwrap();
  assert_eq!(found.name, "John Q. Smith");
  assert!(found.has_right("COURT"));
}

#[tokio::test]
async fn bank_account_lookup_by_person() {
  let s = store().await;
  let account = s.account_for_person(SUSPECT).await.unwrap().unwrap();
  assert_eq!(account.account_id, 1001);
  assert!(s.account_for_person(INVESTIGATOR).await.unwrap().is_none());

  s.upsert_bank_account(BankAccount {
    account_id: 2002,
    person_id:  Some(INVESTIGATOR),
    balance:    -300,
  })
  .await
  .unwrap();
  let account = s.account_for_person(INVESTIGATOR).await.unwrap().unwrap();
  assert_eq!(account.balance, -300);
}

#[tokio::test]
async fn medical_record_upsert_relinks() {
  let s = store().await;
  s.upsert_medical_record(MedicalRecord {
    record_id:     501,
    person_id:     Some(INVESTIGATOR),
    health_status: "injured".into(),
  })
  .await
  .unwrap();

  assert!(s.record_for_person(SUSPECT).await.unwrap().is_none());
  let record = s.record_for_person(INVESTIGATOR).await.unwrap().unwrap();
  assert_eq!(record.health_status, "injured");
}

// ─── Case store ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_case_starts_open_and_reads_back() {
  let s = store().await;
  let j = justice(&s);

  let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  assert_eq!(case.status, CaseStatus::Open);
  assert_eq!(case.investigator_id, INVESTIGATOR);
  assert_eq!(case.complainant, Party::FreeText { name: "Jane Doe".into() });
  assert_eq!(
    case.suspect,
    Party::Person { person_id: SUSPECT, name: "John Smith".into() }
  );

  let fetched = s.get_case(case.case_id).await.unwrap().unwrap();
  assert_eq!(fetched, case);
}

#[tokio::test]
async fn get_case_missing_returns_none() {
  let s = store().await;
  assert!(s.get_case(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn transition_unknown_case_is_not_found() {
  let s = store().await;
  let id = Uuid::new_v4();
  let err = s
    .transition_case(id, CaseTransition::Close)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::CaseNotFound(got)) if got == id));
}

#[tokio::test]
async fn forbidden_transition_leaves_status_unchanged() {
  let s = store().await;
  let j = justice(&s);
  let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();

  let err = s
    .transition_case(case.case_id, CaseTransition::PronounceVerdict)
    .await
    .unwrap_err();
  assert!(is_invalid_state(&CoreError::from(err)));

  let fetched = s.get_case(case.case_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, CaseStatus::Open);
}

#[tokio::test]
async fn cases_by_suspect_oldest_first() {
  let s = store().await;
  let j = justice(&s);
  let first = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  let second = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  j.create_case(
    &police(),
    INVESTIGATOR,
    CaseDraft { suspect: PartySpec::named("Unknown cyclist"), ..draft() },
  )
  .await
  .unwrap();

  let ids: Vec<_> = s
    .list_cases_by_suspect(SUSPECT)
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.case_id)
    .collect();
  assert_eq!(ids, vec![first.case_id, second.case_id]);
}

// ─── Lifecycle scenarios ─────────────────────────────────────────────────────

#[tokio::test]
async fn full_lifecycle_with_appeal() {
  let s = store().await;
  let j = justice(&s);

  let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  let case = j.send_to_court(&police(), case.case_id).await.unwrap();
  assert_eq!(case.status, CaseStatus::SentToCourt);

  let hearing = j
    .create_hearing(&court(), hearing_draft(case.case_id, "Guilty"))
    .await
    .unwrap();
  assert_eq!(hearing.plaintiff, Party::City);
  assert_eq!(
    j.get_case(case.case_id).await.unwrap().status,
    CaseStatus::VerdictPronounced
  );

  let appealed = j
    .appeal_hearing(&court(), hearing.hearing_id, appeal("Not guilty"))
    .await
    .unwrap();
  assert_eq!(appealed.verdict, "Not guilty");
  assert_eq!(appealed.hearing_id, hearing.hearing_id);
  assert_eq!(
    j.get_case(case.case_id).await.unwrap().status,
    CaseStatus::VerdictPronounced
  );

  let revisions = j.list_hearing_revisions(hearing.hearing_id).await.unwrap();
  assert_eq!(revisions.len(), 1);
  assert_eq!(revisions[0].verdict, "Guilty");
  assert_eq!(revisions[0].protocol, "Witnesses heard");

  let hearings = j.list_hearings_by_case(case.case_id).await.unwrap();
  assert_eq!(hearings.len(), 1);
  assert_eq!(hearings[0].verdict, "Not guilty");

  let closed = j.close_case(&police(), case.case_id).await.unwrap();
  assert_eq!(closed.status, CaseStatus::Closed);
}

#[tokio::test]
async fn pronouncing_twice_is_idempotent() {
  let s = store().await;
  let j = justice(&s);
  let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  j.send_to_court(&police(), case.case_id).await.unwrap();
  j.create_hearing(&court(), hearing_draft(case.case_id, "Guilty"))
    .await
    .unwrap();

  let before = s.get_case(case.case_id).await.unwrap().unwrap();
  let after = s
    .transition_case(case.case_id, CaseTransition::PronounceVerdict)
    .await
    .unwrap();
  assert_eq!(after.status, CaseStatus::VerdictPronounced);
  assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn concurrent_send_to_court_admits_one_winner() {
  let s = store().await;
  let j = justice(&s);

  for _ in 0..10 {
    let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
    let id = case.case_id;

    let (pa, pb) = (police(), police());
    let (a, b) = tokio::join!(
      j.send_to_court(&pa, id),
      j.send_to_court(&pb, id),
    );
    let (won, lost) = match (a, b) {
      (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => (won, lost),
      (a, b) => panic!("expected exactly one success, got {a:?} and {b:?}"),
    };
    assert_eq!(won.status, CaseStatus::SentToCourt);
    assert!(is_invalid_state(&lost));
    assert_eq!(j.get_case(id).await.unwrap().status, CaseStatus::SentToCourt);
  }
}

#[tokio::test]
async fn hearing_on_open_case_is_rejected() {
  let s = store().await;
  let j = justice(&s);
  let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();

  let err = j
    .create_hearing(&court(), hearing_draft(case.case_id, "Guilty"))
    .await
    .unwrap_err();
  assert!(is_invalid_state(&err));

  assert!(j.list_hearings_by_case(case.case_id).await.unwrap().is_empty());
  assert_eq!(j.get_case(case.case_id).await.unwrap().status, CaseStatus::Open);
}

#[tokio::test]
async fn hearing_on_closed_case_is_rejected() {
  let s = store().await;
  let j = justice(&s);
  let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  j.send_to_court(&police(), case.case_id).await.unwrap();
  j.close_case(&police(), case.case_id).await.unwrap();

  let err = j
    .create_hearing(&court(), hearing_draft(case.case_id, "Guilty"))
    .await
    .unwrap_err();
  assert!(is_invalid_state(&err));
  assert!(j.list_hearings_by_case(case.case_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn hearing_on_unknown_case_is_not_found() {
  let s = store().await;
  let j = justice(&s);
  let err = j
    .create_hearing(&court(), hearing_draft(Uuid::new_v4(), "Guilty"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn closed_case_cannot_be_edited_or_reclosed() {
  let s = store().await;
  let j = justice(&s);
  let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  j.close_case(&police(), case.case_id).await.unwrap();

  let edit = CaseDraft { statement: "Amended".into(), ..draft() };
  let err = j
    .update_case(&police(), case.case_id, edit)
    .await
    .unwrap_err();
  assert!(is_invalid_state(&err));

  let err = j.close_case(&police(), case.case_id).await.unwrap_err();
  assert!(is_invalid_state(&err));

  let fetched = j.get_case(case.case_id).await.unwrap();
  assert_eq!(fetched.statement, case.statement);
}

#[tokio::test]
async fn update_replaces_details_and_keeps_status() {
  let s = store().await;
  let j = justice(&s);
  let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  j.send_to_court(&police(), case.case_id).await.unwrap();

  let edit = CaseDraft {
    statement: "  Bicycle and helmet stolen ".into(),
    evidence_url: Some("https://evidence.example/123".into()),
    ..draft()
  };
  let updated = j.update_case(&police(), case.case_id, edit).await.unwrap();
  assert_eq!(updated.statement, "Bicycle and helmet stolen");
  assert_eq!(updated.status, CaseStatus::SentToCourt);
  assert_eq!(updated.created_at, case.created_at);

  let fetched = j.get_case(case.case_id).await.unwrap();
  assert_eq!(fetched, updated);
}

#[tokio::test]
async fn appeal_on_closed_case_rolls_back() {
  let s = store().await;
  let j = justice(&s);
  let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  j.send_to_court(&police(), case.case_id).await.unwrap();
  let hearing = j
    .create_hearing(&court(), hearing_draft(case.case_id, "Guilty"))
    .await
    .unwrap();
  j.close_case(&court(), case.case_id).await.unwrap();

  let err = j
    .appeal_hearing(&court(), hearing.hearing_id, appeal("Not guilty"))
    .await
    .unwrap_err();
  assert!(is_invalid_state(&err));

  let unchanged = j.get_hearing(hearing.hearing_id).await.unwrap();
  assert_eq!(unchanged.verdict, "Guilty");
  assert!(
    j.list_hearing_revisions(hearing.hearing_id)
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn appeal_unknown_hearing_is_not_found() {
  let s = store().await;
  let j = justice(&s);
  let id = Uuid::new_v4();
  let err = j
    .appeal_hearing(&court(), id, appeal("Not guilty"))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::HearingNotFound(got) if got == id));
}

#[tokio::test]
async fn party_name_is_a_snapshot() {
  let s = store().await;
  let j = justice(&s);
  let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();

  s.upsert_person(person(SUSPECT, "Johnny Smith", &[])).await.unwrap();

  let fetched = j.get_case(case.case_id).await.unwrap();
  assert_eq!(fetched.suspect.display_name(), "John Smith");
}

#[tokio::test]
async fn unknown_participants_are_rejected() {
  let s = store().await;
  let j = justice(&s);

  let err = j
    .create_case(&police(), 1234, draft())
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::PersonNotFound(1234)));

  let bad = CaseDraft { suspect: PartySpec::person(1234), ..draft() };
  let err = j.create_case(&police(), INVESTIGATOR, bad).await.unwrap_err();
  assert!(matches!(err, CoreError::PersonNotFound(1234)));

  let city = CaseDraft { complainant: PartySpec::city(), ..draft() };
  let err = j.create_case(&police(), INVESTIGATOR, city).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn hearings_by_plaintiff() {
  let s = store().await;
  let j = justice(&s);
  let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  j.send_to_court(&police(), case.case_id).await.unwrap();
  let hearing = j
    .create_hearing(
      &court(),
      HearingDraft {
        plaintiff: PartySpec::person(SUSPECT),
        ..hearing_draft(case.case_id, "Acquitted")
      },
    )
    .await
    .unwrap();

  let found = j.list_hearings_by_plaintiff(SUSPECT).await.unwrap();
  assert_eq!(found, vec![hearing]);
  assert!(j.list_hearings_by_plaintiff(INVESTIGATOR).await.unwrap().is_empty());
}

// ─── Authorization ───────────────────────────────────────────────────────────

#[tokio::test]
async fn mutations_require_a_granted_role() {
  let s = store().await;
  let j = justice(&s);

  let err = j
    .create_case(&court(), INVESTIGATOR, draft())
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Unauthorized(Operation::CreateCase)));

  let case = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  j.send_to_court(&police(), case.case_id).await.unwrap();

  let err = j
    .create_hearing(&police(), hearing_draft(case.case_id, "Guilty"))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Unauthorized(Operation::CreateHearing)));
  assert!(j.list_hearings_by_case(case.case_id).await.unwrap().is_empty());
}

// ─── Dossiers ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn dossier_lists_exactly_the_suspects_cases() {
  let s = store().await;
  let j = justice(&s);
  let a = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  let b = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  j.create_case(
    &police(),
    INVESTIGATOR,
    CaseDraft { suspect: PartySpec::person(INVESTIGATOR), ..draft() },
  )
  .await
  .unwrap();

  let dossier = j.build_dossier(&police(), SUSPECT).await.unwrap();
  let ids: BTreeSet<_> =
    dossier.cases_as_suspect.iter().map(|c| c.case_id).collect();
  assert_eq!(ids, BTreeSet::from([a.case_id, b.case_id]));
  assert_eq!(dossier.case_count, 2);
  assert_eq!(dossier.hearing_count, 0);
  assert_eq!(dossier.person.name, "John Smith");
  assert_eq!(dossier.health_status, Enrichment::Present("healthy".into()));
  assert_eq!(
    dossier.bank,
    Enrichment::Present(BankSummary { account_id: 1001, balance: 12_500 })
  );
}

#[tokio::test]
async fn dossier_lists_exactly_the_plaintiffs_hearings() {
  let s = store().await;
  let j = justice(&s);

  let c1 = j.create_case(&police(), INVESTIGATOR, draft()).await.unwrap();
  j.send_to_court(&police(), c1.case_id).await.unwrap();
  let h1 = j
    .create_hearing(
      &court(),
      HearingDraft {
        plaintiff: PartySpec::person(SUSPECT),
        ..hearing_draft(c1.case_id, "Guilty")
      },
    )
    .await
    .unwrap();
  let h1 = j
    .appeal_hearing(&court(), h1.hearing_id, appeal("Not guilty"))
    .await
    .unwrap();

  // Another suspect's case, heard with the investigator as plaintiff.
  let other = j
    .create_case(
      &police(),
      INVESTIGATOR,
      CaseDraft { suspect: PartySpec::person(JOKER), ..draft() },
    )
    .await
    .unwrap();
  j.send_to_court(&police(), other.case_id).await.unwrap();
  j.create_hearing(
    &court(),
    HearingDraft {
      plaintiff: PartySpec::person(INVESTIGATOR),
      ..hearing_draft(other.case_id, "Guilty")
    },
  )
  .await
  .unwrap();

  let dossier = j.build_dossier(&police(), SUSPECT).await.unwrap();
  let c1 = j.get_case(c1.case_id).await.unwrap();
  assert_eq!(dossier.cases_as_suspect, vec![c1]);
  assert_eq!(dossier.case_count, 1);
  assert_eq!(dossier.hearing_count, 1);
  assert_eq!(dossier.hearings_as_plaintiff, vec![h1]);
  assert_eq!(dossier.hearings_as_plaintiff[0].verdict, "Not guilty");
  assert!(
    dossier
      .hearings_as_plaintiff
      .iter()
      .all(|h| h.plaintiff.person_id() == Some(SUSPECT))
  );
}

#[tokio::test]
async fn dossier_without_enrichment_sources() {
  let s = store().await;
  let j = justice(&s);

  let dossier = j.build_dossier(&police(), INVESTIGATOR).await.unwrap();
  assert_eq!(dossier.case_count, 0);
  assert_eq!(dossier.bank, Enrichment::Absent);
  assert_eq!(dossier.health_status, Enrichment::Absent);
}

#[derive(Debug, thiserror::Error)]
#[error("ledger offline")]
struct Offline;

struct OfflineBank;

impl BankLedger for OfflineBank {
  type Error = Offline;

  async fn account_for_person(
    &self,
    _id: PersonId,
  ) -> Result<Option<BankAccount>, Offline> {
    Err(Offline)
  }
}

#[tokio::test]
async fn dossier_degrades_when_bank_is_offline() {
  let s = store().await;
  let j = Justice::new(
    Arc::new(s.clone()),
    Arc::new(OfflineBank),
    Arc::new(s.clone()),
    Arc::new(RolePolicy::default()),
  );

  let dossier = j.build_dossier(&police(), SUSPECT).await.unwrap();
  assert_eq!(dossier.bank, Enrichment::Unavailable);
  assert!(dossier.health_status.is_present());
}

struct OfflineRegistry;

impl MedicalRegistry for OfflineRegistry {
  type Error = Offline;

  async fn record_for_person(
    &self,
    _id: PersonId,
  ) -> Result<Option<MedicalRecord>, Offline> {
    Err(Offline)
  }
}

#[tokio::test]
async fn dossier_falls_back_to_mirrored_health_when_registry_is_offline() {
  let s = store().await;
  s.upsert_person(Person {
    health_status: "convalescent".into(),
    ..person(SUSPECT, "John Smith", &[])
  })
  .await
  .unwrap();
  let j = Justice::new(
    Arc::new(s.clone()),
    Arc::new(s.clone()),
    Arc::new(OfflineRegistry),
    Arc::new(RolePolicy::default()),
  );

  let dossier = j.build_dossier(&police(), SUSPECT).await.unwrap();
  assert_eq!(
    dossier.health_status.as_present().map(String::as_str),
    Some("convalescent")
  );
  assert!(dossier.bank.is_present());

  // Nothing mirrored on the person: the registry failure shows through.
  let dossier = j.build_dossier(&police(), INVESTIGATOR).await.unwrap();
  assert_eq!(dossier.health_status, Enrichment::Unavailable);
}

#[tokio::test]
async fn dossier_access_rules() {
  let s = store().await;
  let j = justice(&s);

  // Own dossier needs no role.
  let me = Caller { person_id: Some(SUSPECT), roles: BTreeSet::new() };
  assert!(j.build_dossier(&me, SUSPECT).await.is_ok());

  let err = j.build_dossier(&me, INVESTIGATOR).await.unwrap_err();
  assert!(matches!(err, CoreError::Unauthorized(Operation::ViewDossier)));

  // Privileged subjects are hidden from unprivileged roles.
  let err = j.build_dossier(&police(), JOKER).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Authorization);
  let admin = Caller::new(None, [Role::Administrator]);
  assert!(j.build_dossier(&admin, JOKER).await.is_ok());

  let err = j.build_dossier(&admin, 1234).await.unwrap_err();
  assert!(matches!(err, CoreError::PersonNotFound(1234)));
}
