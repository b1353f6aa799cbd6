use chrono::{Duration, Utc};
use serde_json::json;

use dealer_crm::domain::commission::{CommissionStatus, NewCommission, NewCommissionRule, SaleType};
use dealer_crm::domain::prospect::{NewProspect, ProspectStatus};
use dealer_crm::domain::prospect_event::{NewProspectEvent, ProspectEventType};
use dealer_crm::domain::recording::{NewRecording, RecordingProgress, RecordingStatus};
use dealer_crm::domain::spcc::{NewSpccEvaluation, SpccClassification, SpccPillars};
use dealer_crm::domain::types::{
    BasisPoints, Latitude, LeadSource, Longitude, MoneyCents, PillarScore, ProspectName,
    RadiusMeters, StorageKey, UserEmail, ZoneName,
};
use dealer_crm::domain::zone::{GeoPoint, NewZone};
use dealer_crm::repository::{
    CommissionReader, CommissionWriter, DateRange, GuardDutyReader, GuardDutyWriter,
    MetricsReader, ProspectEventListQuery, ProspectEventReader, ProspectEventWriter,
    ProspectListQuery, ProspectReader, ProspectWriter, RecordingReader, RecordingWriter,
    SpccReader, SpccWriter, TenancyReader, UserReader, UserWriter, ZoneReader, ZoneWriter,
};

mod common;

fn new_prospect(agency: &dealer_crm::domain::tenancy::Agency, name: &str) -> NewProspect {
    NewProspect::new(
        agency.id,
        ProspectName::new(name).unwrap(),
        LeadSource::new("walk-in").unwrap(),
    )
}

fn today_range() -> DateRange {
    let today = Utc::now().date_naive();
    DateRange::new(
        today.and_hms_opt(0, 0, 0).unwrap() - Duration::days(1),
        today.and_hms_opt(0, 0, 0).unwrap() + Duration::days(2),
    )
}

#[test]
fn test_tenancy_and_user_scoping() {
    let test_db = common::TestDb::new("test_tenancy_and_user_scoping.db");
    let repo = test_db.repo();

    let north = common::seed_agency(&repo, "Norte");
    let south = common::seed_agency(&repo, "Sur");

    let fetched = repo.get_agency_by_id(north.id).unwrap().unwrap();
    assert_eq!(fetched.name.as_str(), "Norte");
    assert_eq!(repo.list_agencies_in_group(north.group_id).unwrap().len(), 1);
    assert_eq!(repo.list_brands().unwrap().len(), 2);

    let ana = common::seed_user(&repo, &north, "Ana");
    // Same email in another agency is a different user.
    let ana_south = common::seed_user(&repo, &south, "Ana");
    assert_ne!(ana.id, ana_south.id);

    // Upsert keeps the id.
    let again = common::seed_user(&repo, &north, "Ana");
    assert_eq!(again.id, ana.id);

    assert!(repo.get_user_by_id(ana.id, south.id).unwrap().is_none());
    let email = UserEmail::new("ana@dealer.test").unwrap();
    assert_eq!(
        repo.get_user_by_email(&email, north.id).unwrap().unwrap().id,
        ana.id
    );

    let inactive = repo.set_user_active(ana.id, north.id, false).unwrap();
    assert!(!inactive.is_active);
}

#[test]
fn test_prospect_lifecycle_and_events() {
    let test_db = common::TestDb::new("test_prospect_lifecycle_and_events.db");
    let repo = test_db.repo();
    let agency = common::seed_agency(&repo, "Centro");
    let other = common::seed_agency(&repo, "Otra");
    let seller = common::seed_user(&repo, &agency, "Luis");

    let created = repo
        .create_prospect(&new_prospect(&agency, "Maria Lopez").assigned_to(Some(seller.id)))
        .unwrap();
    assert_eq!(created.status, ProspectStatus::New);
    assert_eq!(
        repo.create_prospects(&[
            new_prospect(&agency, "Jorge Perez"),
            new_prospect(&agency, "Sofia Ruiz"),
        ])
        .unwrap(),
        2
    );

    let (total, _) = repo.list_prospects(ProspectListQuery::new(agency.id)).unwrap();
    assert_eq!(total, 3);
    let (total, items) = repo
        .list_prospects(ProspectListQuery::new(agency.id).search("Maria"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, created.id);
    let (mine, _) = repo
        .list_prospects(ProspectListQuery::new(agency.id).assigned_to(seller.id))
        .unwrap();
    assert_eq!(mine, 1);

    // Other agencies never see it.
    assert!(repo.get_prospect_by_id(created.id, other.id).unwrap().is_none());

    let sold = repo
        .set_prospect_status(created.id, agency.id, ProspectStatus::Sold)
        .unwrap();
    assert_eq!(sold.status, ProspectStatus::Sold);
    assert!(
        repo.list_recent_open_prospects(agency.id, seller.id, 10)
            .unwrap()
            .is_empty()
    );

    repo.create_prospect_event(&NewProspectEvent::new(
        created.id,
        seller.id,
        ProspectEventType::Comment,
        json!({"text": "Quiere financiamiento"}),
    ))
    .unwrap();
    repo.create_prospect_event(&NewProspectEvent::new(
        created.id,
        seller.id,
        ProspectEventType::Call,
        json!({"text": "Sin respuesta"}),
    ))
    .unwrap();

    let (total, events) = repo
        .list_prospect_events(ProspectEventListQuery::new(created.id))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(events[0].1.id, seller.id);
    let (calls, _) = repo
        .list_prospect_events(
            ProspectEventListQuery::new(created.id).event_type(ProspectEventType::Call),
        )
        .unwrap();
    assert_eq!(calls, 1);

    repo.delete_prospect(created.id, agency.id).unwrap();
    assert!(repo.get_prospect_by_id(created.id, agency.id).unwrap().is_none());
}

#[test]
fn test_assignment_roster_and_loads() {
    let test_db = common::TestDb::new("test_assignment_roster_and_loads.db");
    let repo = test_db.repo();
    let agency = common::seed_agency(&repo, "Guardia");
    let ana = common::seed_user(&repo, &agency, "Ana");
    let luis = common::seed_user(&repo, &agency, "Luis");

    let first = repo.create_prospect(&new_prospect(&agency, "Uno")).unwrap();
    let second = repo.create_prospect(&new_prospect(&agency, "Dos")).unwrap();
    let affected = repo
        .assign_prospects(agency.id, Some(ana.id), &[first.id, second.id])
        .unwrap();
    assert_eq!(affected, 2);

    let today = Utc::now().date_naive();
    assert_eq!(repo.replace_roster(agency.id, today, &[ana.id, luis.id]).unwrap(), 2);
    assert_eq!(repo.replace_roster(agency.id, today, &[luis.id]).unwrap(), 1);
    let roster = repo.list_roster(agency.id, today).unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].user_id, luis.id);

    let loads = repo.list_user_loads(agency.id, None).unwrap();
    assert_eq!(loads.len(), 2);
    assert_eq!(loads[0].user.id, ana.id);
    assert_eq!(loads[0].open_prospects, 2);
    assert_eq!(loads[1].open_prospects, 0);

    let only_luis = repo.list_user_loads(agency.id, Some(vec![luis.id])).unwrap();
    assert_eq!(only_luis.len(), 1);
}

#[test]
fn test_spcc_evaluation_updates_prospect() {
    let test_db = common::TestDb::new("test_spcc_evaluation_updates_prospect.db");
    let repo = test_db.repo();
    let agency = common::seed_agency(&repo, "Spcc");
    let seller = common::seed_user(&repo, &agency, "Eva");
    let prospect = repo.create_prospect(&new_prospect(&agency, "Carlos")).unwrap();

    let score = |v| PillarScore::new(v).unwrap();
    let pillars = SpccPillars::new(score(8), score(9), score(7), score(8));
    let evaluation = repo
        .create_spcc_evaluation(&NewSpccEvaluation::new(prospect.id, seller.id, pillars))
        .unwrap();
    assert_eq!(evaluation.classification, SpccClassification::Elite);

    let refreshed = repo.get_prospect_by_id(prospect.id, agency.id).unwrap().unwrap();
    assert_eq!(refreshed.spcc_score, Some(81));
    assert_eq!(refreshed.spcc_classification, Some(SpccClassification::Elite));
    assert_eq!(repo.list_spcc_evaluations(prospect.id).unwrap().len(), 1);

    let counts = repo
        .count_prospects_by_classification(agency.id, today_range())
        .unwrap();
    assert!(counts.contains(&(Some(SpccClassification::Elite), 1)));
}

#[test]
fn test_zones_and_recording_progress() {
    let test_db = common::TestDb::new("test_zones_and_recording_progress.db");
    let repo = test_db.repo();
    let agency = common::seed_agency(&repo, "Zonas");
    let seller = common::seed_user(&repo, &agency, "Rosa");

    let zone = repo
        .create_zone(&NewZone {
            agency_id: agency.id,
            name: ZoneName::new("Piso de ventas").unwrap(),
            center: GeoPoint::new(
                Latitude::new(19.4326).unwrap(),
                Longitude::new(-99.1332).unwrap(),
            ),
            radius: RadiusMeters::new(40.0).unwrap(),
        })
        .unwrap();
    assert!(zone.is_active);
    assert_eq!(repo.list_zones(agency.id, true).unwrap().len(), 1);

    let recording = repo
        .create_recording(&NewRecording {
            agency_id: agency.id,
            user_id: seller.id,
            prospect_id: None,
            zone_id: Some(zone.id),
            storage_key: StorageKey::generate("webm"),
            mime_type: "audio/webm".into(),
            size_bytes: 2048,
            duration_seconds: Some(95),
        })
        .unwrap();
    assert_eq!(recording.status, RecordingStatus::Uploaded);

    let transcribed = repo
        .apply_recording_progress(
            recording.id,
            agency.id,
            &RecordingProgress::Transcribed {
                transcript: "Buenas tardes".into(),
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(transcribed.status, RecordingStatus::Transcribed);
    assert_eq!(transcribed.transcript.as_deref(), Some("Buenas tardes"));

    // Late `Transcribing` report does not move the status back.
    let stale = repo
        .apply_recording_progress(recording.id, agency.id, &RecordingProgress::Transcribing)
        .unwrap();
    assert!(stale.is_none());
    let current = repo
        .get_recording_by_id(recording.id, agency.id)
        .unwrap()
        .unwrap();
    assert_eq!(current.status, RecordingStatus::Transcribed);

    assert_eq!(repo.count_recordings(agency.id, today_range()).unwrap(), 1);

    repo.delete_zone(zone.id, agency.id).unwrap();
    assert!(repo.get_zone_by_id(zone.id, agency.id).unwrap().is_none());
}

#[test]
fn test_commission_rules_and_sales() {
    let test_db = common::TestDb::new("test_commission_rules_and_sales.db");
    let repo = test_db.repo();
    let agency = common::seed_agency(&repo, "Ventas");
    let seller = common::seed_user(&repo, &agency, "Pablo");

    let rule = |percent| NewCommissionRule {
        agency_id: agency.id,
        sale_type: SaleType::New,
        percent: BasisPoints::new(percent).unwrap(),
        fixed_bonus: MoneyCents::new(50_000).unwrap(),
    };
    let first = repo.upsert_commission_rule(&rule(100)).unwrap();
    let replaced = repo.upsert_commission_rule(&rule(150)).unwrap();
    assert_eq!(first.id, replaced.id);
    assert_eq!(replaced.percent.get(), 150);
    assert_eq!(repo.list_commission_rules(agency.id).unwrap().len(), 1);

    let stored_rule = repo
        .get_commission_rule(agency.id, SaleType::New)
        .unwrap()
        .unwrap();
    let amount = MoneyCents::new(45_000_000).unwrap();
    let commission = repo
        .create_commission(&NewCommission {
            agency_id: agency.id,
            user_id: seller.id,
            prospect_id: None,
            vehicle_id: None,
            sale_type: SaleType::New,
            sale_amount: amount,
            commission: stored_rule.commission_for(amount),
            sold_at: Utc::now().naive_utc(),
        })
        .unwrap();
    assert_eq!(commission.commission.get(), 725_000);
    assert_eq!(commission.status, CommissionStatus::Pending);

    let approved = repo
        .set_commission_status(commission.id, agency.id, CommissionStatus::Approved)
        .unwrap();
    assert_eq!(approved.status, CommissionStatus::Approved);

    let listed = repo
        .list_commissions(agency.id, today_range(), Some(seller.id))
        .unwrap();
    assert_eq!(listed.len(), 1);
    let before = DateRange::new(
        today_range().from - Duration::days(30),
        today_range().from,
    );
    assert!(repo.list_commissions(agency.id, before, None).unwrap().is_empty());
}

#[test]
fn test_metrics_counts() {
    let test_db = common::TestDb::new("test_metrics_counts.db");
    let repo = test_db.repo();
    let agency = common::seed_agency(&repo, "Metricas");
    let seller = common::seed_user(&repo, &agency, "Nora");

    let won = repo
        .create_prospect(&new_prospect(&agency, "Gana").assigned_to(Some(seller.id)))
        .unwrap();
    repo.create_prospect(&new_prospect(&agency, "Abierto").assigned_to(Some(seller.id)))
        .unwrap();
    repo.set_prospect_status(won.id, agency.id, ProspectStatus::Sold)
        .unwrap();

    let by_status = repo.count_prospects_by_status(agency.id, today_range()).unwrap();
    assert!(by_status.contains(&(ProspectStatus::Sold, 1)));
    assert!(by_status.contains(&(ProspectStatus::New, 1)));

    let by_source = repo.count_prospects_by_source(agency.id, today_range()).unwrap();
    assert_eq!(by_source, vec![("walk-in".to_string(), 2)]);

    let by_user = repo.count_prospects_by_user(agency.id, today_range()).unwrap();
    assert_eq!(by_user.len(), 1);
    assert_eq!(by_user[0].user_id, seller.id);
    assert_eq!(by_user[0].sold, 1);
    assert_eq!(by_user[0].open, 1);
    assert_eq!(by_user[0].total, 2);
}

#[test]
fn test_prospect_search_treats_wildcards_literally() {
    let test_db = common::TestDb::new("test_prospect_search_treats_wildcards_literally.db");
    let repo = test_db.repo();
    let agency = common::seed_agency(&repo, "Comodines");

    repo.create_prospects(&[
        new_prospect(&agency, "Ana Torres"),
        new_prospect(&agency, "Flota_Norte"),
        new_prospect(&agency, "Descuento 100%"),
    ])
    .unwrap();

    let (total, items) = repo
        .list_prospects(ProspectListQuery::new(agency.id).search("_"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name.as_str(), "Flota_Norte");

    let (total, items) = repo
        .list_prospects(ProspectListQuery::new(agency.id).search("%"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name.as_str(), "Descuento 100%");

    let (total, items) = repo
        .list_prospects(ProspectListQuery::new(agency.id).paginate(usize::MAX, 20))
        .unwrap();
    assert_eq!(total, 3);
    assert!(items.is_empty());
}
