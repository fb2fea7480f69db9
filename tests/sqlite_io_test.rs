// ==========================================
// SQLite 持久化层测试
// ==========================================
// 目标: 各实体族 写入 → 回读 的值保真; 同名 upsert 身份稳定;
//       整集写入的替换语义; 删除辅助与 setup 表清理
// ==========================================


use envmon_config_db::db::open_sqlite_connection;
use envmon_config_db::domain::{
    DataSource, DataTypeKey, DbEnum, EngineeringUnit, EnumValue, EquipmentModel, NetworkList,
    NetworkListEntry, Platform, PlatformConfig, RoutingSpec, Site, SiteName, TransportMedium,
    UnitConverter,
};
use envmon_config_db::domain::schedule::IntervalRecord;
use envmon_config_db::repository::{DatabaseIo, RepositoryError, SqliteDatabaseIo};
use std::sync::{Arc, Mutex};

fn open_io() -> (tempfile::TempDir, SqliteDatabaseIo) {
    let (dir, db_path) = test_helpers::create_test_db();
    let io = SqliteDatabaseIo::new(&db_path).unwrap();
    (dir, io)
}

fn riverton_site() -> Site {
    let mut site = Site::new();
    site.add_name(SiteName::new("usgs", "12345678"));
    site.add_name(SiteName::new("local", "RIVERTON"));
    site.description = Some("河滨监测站".into());
    site.elevation = Some(1523.6);
    site
}

#[test]
fn site_upsert_is_stable_by_preferred_name() {
    let (_dir, io) = open_io();
    let mut site = riverton_site();
    let first_id = io.write_site(&site).unwrap();

    site.description = Some("改写后的描述".into());
    let second_id = io.write_site(&site).unwrap();
    assert_eq!(first_id, second_id);

    let db = io.read_all().unwrap();
    assert_eq!(db.sites.len(), 1);
    let loaded = &db.sites[0];
    assert_eq!(loaded.id, Some(first_id));
    assert_eq!(loaded.names.len(), 2);
    assert_eq!(loaded.description.as_deref(), Some("改写后的描述"));
    assert_eq!(loaded.elevation, Some(1523.6));
}

#[test]
fn site_without_name_is_rejected() {
    let (_dir, io) = open_io();
    let err = io.write_site(&Site::new()).unwrap_err();
    assert!(matches!(err, RepositoryError::MissingIdentity(_)));
    assert!(!err.is_fatal());
}

#[test]
fn platform_roundtrip_restores_references() {
    let (_dir, io) = open_io();

    let mut model = EquipmentModel::named("SU8200");
    model.company = Some("Sutron".into());
    io.write_equipment_model(&model).unwrap();

    let mut config = PlatformConfig::named("cfg1");
    config.equipment_model = Some(model);
    io.write_platform_config(&config).unwrap();

    let mut site = riverton_site();
    site.id = Some(io.write_site(&site).unwrap());

    let mut platform = Platform::new();
    platform.site = Some(site);
    platform.config = Some(config);
    platform.designator = Some("A".into());
    let mut tm = TransportMedium::new("goes", "CE123456");
    tm.channel = Some(99);
    platform.transport_media.push(tm);
    let platform_id = io.write_platform(&platform).unwrap();

    let db = io.read_all().unwrap();
    assert_eq!(db.platforms.len(), 1);
    let loaded = &db.platforms[0];
    assert_eq!(loaded.id, Some(platform_id));
    assert_eq!(loaded.designator.as_deref(), Some("A"));
    assert_eq!(loaded.transport_media[0].channel, Some(99));
    // 站点/配置按名称列还原为已载入集合的副本
    let loaded_site = loaded.site.as_ref().unwrap();
    assert!(loaded_site.id.is_some());
    assert!(loaded_site.has_name_value("RIVERTON"));
    let loaded_config = loaded.config.as_ref().unwrap();
    assert_eq!(loaded_config.name, "cfg1");
    assert!(loaded.config_name.is_none());
}

#[test]
fn platform_write_requires_site_identity() {
    let (_dir, io) = open_io();
    let mut platform = Platform::new();
    let mut site = riverton_site();
    site.id = None;
    platform.site = Some(site);
    platform.config = Some(PlatformConfig::named("cfg1"));
    platform.transport_media.push(TransportMedium::new("goes", "CE1"));

    let err = io.write_platform(&platform).unwrap_err();
    assert!(matches!(err, RepositoryError::MissingIdentity(_)));
    assert!(!err.is_fatal());
}

#[test]
fn platform_replacement_reuses_assigned_id() {
    let (_dir, io) = open_io();
    let mut site = riverton_site();
    site.id = Some(io.write_site(&site).unwrap());

    let mut platform = Platform::new();
    platform.site = Some(site);
    platform.config_name = Some("cfg1".into());
    platform.transport_media.push(TransportMedium::new("goes", "CE1"));
    let id = io.write_platform(&platform).unwrap();

    platform.force_set_id(id);
    platform.designator = Some("B".into());
    assert_eq!(io.write_platform(&platform).unwrap(), id);

    let db = io.read_all().unwrap();
    assert_eq!(db.platforms.len(), 1);
    assert_eq!(db.platforms[0].designator.as_deref(), Some("B"));
}

#[test]
fn name_keyed_families_roundtrip() {
    let (_dir, io) = open_io();

    let mut nl = NetworkList::named("nl1");
    nl.transport_medium_type = Some("goes".into());
    nl.entries.push(NetworkListEntry {
        transport_id: "CE123456".into(),
        platform_name: Some("RIVERTON-A".into()),
        description: None,
    });
    io.write_network_list(&nl).unwrap();

    let mut ds = DataSource::named("lrgs1", "lrgs");
    ds.args = Some("host=lrgs.example.gov".into());
    io.write_data_source(&ds).unwrap();

    let mut rs = RoutingSpec::named("rs1");
    rs.data_source_name = Some("lrgs1".into());
    rs.network_lists.push("nl1".into());
    rs.enable_equations = true;
    rs.properties.insert("sc:DAPS_STATUS".into(), "A".into());
    io.write_routing_spec(&rs).unwrap();

    let db = io.read_all().unwrap();
    assert!(db.network_lists[0].value_eq(&nl));
    assert!(db.data_sources[0].value_eq(&ds));
    assert!(db.routing_specs[0].value_eq(&rs));
}

#[test]
fn whole_set_write_replaces_previous_rows() {
    let (_dir, io) = open_io();

    let mut old_enum = DbEnum::named("DataTypeStandard");
    old_enum.values.push(EnumValue::new("shef-pe", None));
    io.write_enum_list(&[old_enum]).unwrap();

    let mut new_enum = DbEnum::named("TransportMediumType");
    new_enum.values.push(EnumValue::new("goes", None));
    io.write_enum_list(&[new_enum]).unwrap();

    let mut db = io.read_all().unwrap();
    assert_eq!(db.enums.len(), 1);
    assert!(db.find_enum("TransportMediumType").is_some());
    assert!(db.find_enum("DataTypeStandard").is_none());

    let ft = EngineeringUnit::new("ft");
    let mut uc = UnitConverter::new("ft", "m");
    uc.algorithm = "linear".into();
    uc.coefficients[0] = 0.3048;
    io.write_unit_set(&[ft], &[uc]).unwrap();
    io.write_unit_set(&[EngineeringUnit::new("m")], &[]).unwrap();

    db = io.read_all().unwrap();
    assert_eq!(db.engineering_units.len(), 1);
    assert_eq!(db.engineering_units[0].abbr, "m");
    assert!(db.unit_converters.is_empty());

    let group = vec![
        DataTypeKey::new("shef-pe", "HG"),
        DataTypeKey::new("epa-code", "00065"),
    ];
    io.write_equivalences(&[group]).unwrap();
    db = io.read_all().unwrap();
    assert!(db.equivalences.are_equivalent(
        &DataTypeKey::new("shef-pe", "HG"),
        &DataTypeKey::new("epa-code", "00065"),
    ));
}

#[test]
fn interval_write_upserts_by_name() {
    let (_dir, io) = open_io();
    io.write_intervals(&[IntervalRecord {
        name: "15min".into(),
        cal_constant: "minute".into(),
        cal_multiplier: 15,
    }])
    .unwrap();
    io.write_intervals(&[IntervalRecord {
        name: "15MIN".into(),
        cal_constant: "minute".into(),
        cal_multiplier: 30,
    }])
    .unwrap();

    let db = io.read_all().unwrap();
    assert_eq!(db.intervals.len(), 1);
    assert_eq!(db.intervals[0].cal_multiplier, 30);
}

#[test]
fn platform_index_skips_unwritten_platforms() {
    let (_dir, db_path) = test_helpers::create_test_db();
    let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path).unwrap()));
    let io = SqliteDatabaseIo::from_connection(conn.clone()).unwrap();

    let mut written = Platform::new();
    written.force_set_id(7);
    written.transport_media.push(TransportMedium::new("goes", "CE1"));
    let unwritten = Platform::new();
    io.write_platform_index(&[written, unwritten]).unwrap();

    let guard = conn.lock().unwrap();
    let count: i64 = guard
        .query_row("SELECT COUNT(*) FROM platform_index", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn delete_helpers_clear_their_families() {
    let (_dir, io) = open_io();
    io.write_network_list(&NetworkList::named("nl1")).unwrap();
    io.write_data_source(&DataSource::named("lrgs1", "lrgs")).unwrap();
    io.write_routing_spec(&RoutingSpec::named("rs1")).unwrap();
    io.write_enum_list(&[DbEnum::named("Season")]).unwrap();
    io.write_unit_set(&[EngineeringUnit::new("ft")], &[]).unwrap();
    io.write_site(&riverton_site()).unwrap();

    assert_eq!(io.delete_all_routing_specs().unwrap(), 1);
    assert_eq!(io.delete_all_data_sources().unwrap(), 1);
    assert_eq!(io.delete_all_network_lists().unwrap(), 1);
    io.clear_setup_tables().unwrap();

    let db = io.read_all().unwrap();
    assert!(db.routing_specs.is_empty());
    assert!(db.data_sources.is_empty());
    assert!(db.network_lists.is_empty());
    assert!(db.enums.is_empty());
    assert!(db.engineering_units.is_empty());
    // 站点行不在删除辅助覆盖范围内
    assert_eq!(db.sites.len(), 1);
}
