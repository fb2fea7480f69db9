// ==========================================
// 环境监测配置管理系统 - SQLite 持久化实现
// ==========================================
// 职责: DatabaseIo 的 SQLite 落地; 从属集合以 JSON 明细列存储
// 红线: Repository 不含合并/分类逻辑
// ==========================================

use crate::db::configure_sqlite_connection;
use crate::domain::config::{ConfigSensor, EquipmentModel, PlatformConfig};
use crate::domain::data_type::DataTypeKey;
use crate::domain::database::ConfigDatabase;
use crate::domain::enums::{DbEnum, EnumValue};
use crate::domain::platform::{Platform, TransportMedium};
use crate::domain::presentation::{DataPresentation, PresentationGroup};
use crate::domain::routing::{DataSource, NetworkList, NetworkListEntry, RoutingSpec};
use crate::domain::schedule::{CompAppInfo, IntervalRecord, ScheduleEntry};
use crate::domain::site::{Site, SiteName};
use crate::domain::types::EntityId;
use crate::domain::units::{EngineeringUnit, UnitConverter};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::io::DatabaseIo;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub struct SqliteDatabaseIo {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDatabaseIo {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = Connection::open(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        configure_sqlite_connection(&conn)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        let io = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        io.ensure_tables()?;
        Ok(io)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let io = Self { conn };
        io.ensure_tables()?;
        Ok(io)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_tables(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS site (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              preferred_name TEXT NOT NULL UNIQUE COLLATE NOCASE,
              names_json TEXT NOT NULL,
              description TEXT,
              elevation REAL,
              timezone TEXT
            );

            CREATE TABLE IF NOT EXISTS equipment_model (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL UNIQUE COLLATE NOCASE,
              company TEXT,
              model TEXT,
              description TEXT,
              equipment_type TEXT
            );

            CREATE TABLE IF NOT EXISTS platform_config (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL UNIQUE COLLATE NOCASE,
              description TEXT,
              equipment_model_name TEXT,
              sensors_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS platform (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              site_name TEXT,
              config_name TEXT,
              designator TEXT,
              owner_agency TEXT,
              description TEXT,
              expiration TEXT,
              media_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS network_list (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL UNIQUE COLLATE NOCASE,
              transport_medium_type TEXT,
              site_name_type_preference TEXT,
              entries_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS presentation_group (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL UNIQUE COLLATE NOCASE,
              inherits_from TEXT,
              parent TEXT,
              elements_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS data_source (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL UNIQUE COLLATE NOCASE,
              source_type TEXT NOT NULL,
              args TEXT,
              members_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS routing_spec (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL UNIQUE COLLATE NOCASE,
              data_source_name TEXT,
              network_lists_json TEXT NOT NULL,
              consumer_type TEXT,
              consumer_arg TEXT,
              since_time TEXT,
              until_time TEXT,
              enable_equations INTEGER NOT NULL DEFAULT 0,
              properties_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS loading_app (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              app_name TEXT NOT NULL UNIQUE COLLATE NOCASE,
              comment TEXT,
              properties_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS schedule_entry (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL UNIQUE COLLATE NOCASE,
              loading_app_name TEXT,
              routing_spec_name TEXT,
              enabled INTEGER NOT NULL DEFAULT 1,
              start_time TEXT,
              run_interval TEXT
            );

            CREATE TABLE IF NOT EXISTS db_enum (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL UNIQUE COLLATE NOCASE,
              default_value TEXT,
              values_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS engineering_unit (
              abbr TEXT PRIMARY KEY COLLATE NOCASE,
              name TEXT,
              family TEXT,
              measures TEXT
            );

            CREATE TABLE IF NOT EXISTS unit_converter (
              from_abbr TEXT NOT NULL COLLATE NOCASE,
              to_abbr TEXT NOT NULL COLLATE NOCASE,
              algorithm TEXT NOT NULL,
              coefficients_json TEXT NOT NULL,
              PRIMARY KEY (from_abbr, to_abbr)
            );

            CREATE TABLE IF NOT EXISTS data_type_equivalence (
              group_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS platform_index (
              platform_id INTEGER NOT NULL,
              display_name TEXT NOT NULL,
              media_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS interval_record (
              name TEXT PRIMARY KEY COLLATE NOCASE,
              cal_constant TEXT NOT NULL,
              cal_multiplier INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

fn timestamp_to_text(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|t| t.to_rfc3339())
}

fn timestamp_from_text(text: Option<String>) -> Option<DateTime<Utc>> {
    text.and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
        .map(|t| t.with_timezone(&Utc))
}

impl DatabaseIo for SqliteDatabaseIo {
    fn read_all(&self) -> RepositoryResult<ConfigDatabase> {
        let conn = self.get_conn()?;
        let mut db = ConfigDatabase::new();

        let mut stmt = conn.prepare(
            "SELECT id, names_json, description, elevation, timezone FROM site",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<f64>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;
        for row in rows {
            let (id, names_json, description, elevation, timezone) = row?;
            let names: Vec<SiteName> = serde_json::from_str(&names_json)?;
            db.sites.push(Site {
                id: Some(id),
                names,
                description,
                elevation,
                timezone,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT id, name, company, model, description, equipment_type FROM equipment_model",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(EquipmentModel {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                company: row.get(2)?,
                model: row.get(3)?,
                description: row.get(4)?,
                equipment_type: row.get(5)?,
            })
        })?;
        for model in rows {
            db.put_equipment_model(model?);
        }

        let mut stmt = conn.prepare(
            "SELECT id, name, description, equipment_model_name, sensors_json FROM platform_config",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        for row in rows {
            let (id, name, description, em_name, sensors_json) = row?;
            let sensors: Vec<ConfigSensor> = serde_json::from_str(&sensors_json)?;
            let equipment_model = em_name
                .as_deref()
                .and_then(|n| db.get_equipment_model(n).cloned());
            db.put_platform_config(PlatformConfig {
                id: Some(id),
                name,
                description,
                equipment_model,
                sensors,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT id, site_name, config_name, designator, owner_agency, description, \
             expiration, media_json FROM platform",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;
        for row in rows {
            let (id, site_name, config_name, designator, owner_agency, description, expiration, media_json) =
                row?;
            let transport_media: Vec<TransportMedium> = serde_json::from_str(&media_json)?;
            let site = site_name.as_deref().and_then(|n| db.find_site(n).cloned());
            let config = config_name
                .as_deref()
                .and_then(|n| db.get_platform_config(n).cloned());
            // 配置副本已还原时名称引用清空, 与合并后的内存形态保持一致
            let config_name = if config.is_some() { None } else { config_name };
            db.platforms.push(Platform {
                id: Some(id),
                site,
                config,
                config_name,
                designator,
                owner_agency,
                description,
                expiration: timestamp_from_text(expiration),
                transport_media,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT id, name, transport_medium_type, site_name_type_preference, entries_json \
             FROM network_list",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        for row in rows {
            let (id, name, tmt, pref, entries_json) = row?;
            let entries: Vec<NetworkListEntry> = serde_json::from_str(&entries_json)?;
            db.network_lists.push(NetworkList {
                id: Some(id),
                name,
                transport_medium_type: tmt,
                site_name_type_preference: pref,
                entries,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT id, name, inherits_from, parent, elements_json FROM presentation_group",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        for row in rows {
            let (id, name, inherits_from, parent, elements_json) = row?;
            let elements: Vec<DataPresentation> = serde_json::from_str(&elements_json)?;
            db.presentation_groups.push(PresentationGroup {
                id: Some(id),
                name,
                inherits_from,
                parent,
                elements,
            });
        }

        let mut stmt =
            conn.prepare("SELECT id, name, source_type, args, members_json FROM data_source")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        for row in rows {
            let (id, name, source_type, args, members_json) = row?;
            let members: Vec<String> = serde_json::from_str(&members_json)?;
            db.data_sources.push(DataSource {
                id: Some(id),
                name,
                source_type,
                args,
                members,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT id, name, data_source_name, network_lists_json, consumer_type, consumer_arg, \
             since_time, until_time, enable_equations, properties_json FROM routing_spec",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, bool>(8)?,
                row.get::<_, String>(9)?,
            ))
        })?;
        for row in rows {
            let (id, name, dsn, nls_json, ct, ca, since, until, eq, props_json) = row?;
            let network_lists: Vec<String> = serde_json::from_str(&nls_json)?;
            let properties: BTreeMap<String, String> = serde_json::from_str(&props_json)?;
            db.routing_specs.push(RoutingSpec {
                id: Some(id),
                name,
                data_source_name: dsn,
                network_lists,
                consumer_type: ct,
                consumer_arg: ca,
                since_time: since,
                until_time: until,
                enable_equations: eq,
                properties,
            });
        }

        let mut stmt =
            conn.prepare("SELECT id, app_name, comment, properties_json FROM loading_app")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        for row in rows {
            let (id, app_name, comment, props_json) = row?;
            let properties: BTreeMap<String, String> = serde_json::from_str(&props_json)?;
            db.loading_apps.push(CompAppInfo {
                id: Some(id),
                app_name,
                comment,
                properties,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT id, name, loading_app_name, routing_spec_name, enabled, start_time, \
             run_interval FROM schedule_entry",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, bool>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
            ))
        })?;
        for row in rows {
            let (id, name, lan, rsn, enabled, start, run_interval) = row?;
            db.schedule_entries.push(ScheduleEntry {
                id: Some(id),
                name,
                loading_app_name: lan,
                routing_spec_name: rsn,
                enabled,
                start_time: timestamp_from_text(start),
                run_interval,
            });
        }

        let mut stmt = conn.prepare("SELECT id, name, default_value, values_json FROM db_enum")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        for row in rows {
            let (id, name, default_value, values_json) = row?;
            let values: Vec<EnumValue> = serde_json::from_str(&values_json)?;
            db.enums.push(DbEnum {
                id: Some(id),
                name,
                default_value,
                values,
            });
        }

        let mut stmt = conn.prepare("SELECT abbr, name, family, measures FROM engineering_unit")?;
        let rows = stmt.query_map([], |row| {
            Ok(EngineeringUnit {
                abbr: row.get(0)?,
                name: row.get(1)?,
                family: row.get(2)?,
                measures: row.get(3)?,
            })
        })?;
        for eu in rows {
            db.engineering_units.push(eu?);
        }

        let mut stmt = conn.prepare(
            "SELECT from_abbr, to_abbr, algorithm, coefficients_json FROM unit_converter",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        for row in rows {
            let (from_abbr, to_abbr, algorithm, coeff_json) = row?;
            let coefficients: [f64; 6] = serde_json::from_str(&coeff_json)?;
            db.unit_converters.push(UnitConverter {
                from_abbr,
                to_abbr,
                algorithm,
                coefficients,
            });
        }

        let mut stmt = conn.prepare("SELECT group_json FROM data_type_equivalence")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for row in rows {
            let group: Vec<DataTypeKey> = serde_json::from_str(&row?)?;
            for pair in group.windows(2) {
                db.equivalences.assert_equivalence(&pair[0], &pair[1]);
            }
        }

        let mut stmt =
            conn.prepare("SELECT name, cal_constant, cal_multiplier FROM interval_record")?;
        let rows = stmt.query_map([], |row| {
            Ok(IntervalRecord {
                name: row.get(0)?,
                cal_constant: row.get(1)?,
                cal_multiplier: row.get(2)?,
            })
        })?;
        for iv in rows {
            db.intervals.push(iv?);
        }

        Ok(db)
    }

    fn write_site(&self, site: &Site) -> RepositoryResult<EntityId> {
        let preferred = site
            .preferred_name()
            .map(|n| n.value.clone())
            .ok_or_else(|| RepositoryError::MissingIdentity("站点没有名称".to_string()))?;
        let names_json = serde_json::to_string(&site.names)?;
        let conn = self.get_conn()?;
        let existing: Option<EntityId> = conn
            .query_row(
                "SELECT id FROM site WHERE preferred_name = ?1",
                params![preferred],
                |r| r.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE site SET names_json = ?1, description = ?2, elevation = ?3, \
                     timezone = ?4 WHERE id = ?5",
                    params![names_json, site.description, site.elevation, site.timezone, id],
                )?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO site (preferred_name, names_json, description, elevation, timezone) \
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![preferred, names_json, site.description, site.elevation, site.timezone],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    fn write_platform(&self, platform: &Platform) -> RepositoryResult<EntityId> {
        let site_name = match &platform.site {
            Some(site) => {
                if site.id.is_none() {
                    return Err(RepositoryError::MissingIdentity(format!(
                        "平台 {} 的站点尚未写入",
                        platform.display_name()
                    )));
                }
                site.preferred_name().map(|n| n.value.clone())
            }
            None => None,
        };
        let config_name = platform.effective_config_name().map(str::to_string);
        let media_json = serde_json::to_string(&platform.transport_media)?;
        let expiration = timestamp_to_text(platform.expiration);
        let conn = self.get_conn()?;
        match platform.id {
            // 替换场景: 沿用合并阶段指派的既有身份
            Some(id) => {
                let updated = conn.execute(
                    "UPDATE platform SET site_name = ?1, config_name = ?2, designator = ?3, \
                     owner_agency = ?4, description = ?5, expiration = ?6, media_json = ?7 \
                     WHERE id = ?8",
                    params![
                        site_name,
                        config_name,
                        platform.designator,
                        platform.owner_agency,
                        platform.description,
                        expiration,
                        media_json,
                        id
                    ],
                )?;
                if updated == 0 {
                    conn.execute(
                        "INSERT INTO platform (id, site_name, config_name, designator, \
                         owner_agency, description, expiration, media_json) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                        params![
                            id,
                            site_name,
                            config_name,
                            platform.designator,
                            platform.owner_agency,
                            platform.description,
                            expiration,
                            media_json
                        ],
                    )?;
                }
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO platform (site_name, config_name, designator, owner_agency, \
                     description, expiration, media_json) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        site_name,
                        config_name,
                        platform.designator,
                        platform.owner_agency,
                        platform.description,
                        expiration,
                        media_json
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    fn write_platform_config(&self, config: &PlatformConfig) -> RepositoryResult<EntityId> {
        let sensors_json = serde_json::to_string(&config.sensors)?;
        let em_name = config.equipment_model.as_ref().map(|m| m.name.clone());
        let conn = self.get_conn()?;
        let existing: Option<EntityId> = conn
            .query_row(
                "SELECT id FROM platform_config WHERE name = ?1",
                params![config.name],
                |r| r.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE platform_config SET name = ?1, description = ?2, \
                     equipment_model_name = ?3, sensors_json = ?4 WHERE id = ?5",
                    params![config.name, config.description, em_name, sensors_json, id],
                )?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO platform_config (name, description, equipment_model_name, \
                     sensors_json) VALUES (?1, ?2, ?3, ?4)",
                    params![config.name, config.description, em_name, sensors_json],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    fn write_equipment_model(&self, model: &EquipmentModel) -> RepositoryResult<EntityId> {
        let conn = self.get_conn()?;
        let existing: Option<EntityId> = conn
            .query_row(
                "SELECT id FROM equipment_model WHERE name = ?1",
                params![model.name],
                |r| r.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE equipment_model SET name = ?1, company = ?2, model = ?3, \
                     description = ?4, equipment_type = ?5 WHERE id = ?6",
                    params![
                        model.name,
                        model.company,
                        model.model,
                        model.description,
                        model.equipment_type,
                        id
                    ],
                )?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO equipment_model (name, company, model, description, \
                     equipment_type) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        model.name,
                        model.company,
                        model.model,
                        model.description,
                        model.equipment_type
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    fn write_network_list(&self, list: &NetworkList) -> RepositoryResult<EntityId> {
        let entries_json = serde_json::to_string(&list.entries)?;
        let conn = self.get_conn()?;
        let existing: Option<EntityId> = conn
            .query_row(
                "SELECT id FROM network_list WHERE name = ?1",
                params![list.name],
                |r| r.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE network_list SET name = ?1, transport_medium_type = ?2, \
                     site_name_type_preference = ?3, entries_json = ?4 WHERE id = ?5",
                    params![
                        list.name,
                        list.transport_medium_type,
                        list.site_name_type_preference,
                        entries_json,
                        id
                    ],
                )?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO network_list (name, transport_medium_type, \
                     site_name_type_preference, entries_json) VALUES (?1, ?2, ?3, ?4)",
                    params![
                        list.name,
                        list.transport_medium_type,
                        list.site_name_type_preference,
                        entries_json
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    fn write_presentation_group(&self, group: &PresentationGroup) -> RepositoryResult<EntityId> {
        let elements_json = serde_json::to_string(&group.elements)?;
        let conn = self.get_conn()?;
        let existing: Option<EntityId> = conn
            .query_row(
                "SELECT id FROM presentation_group WHERE name = ?1",
                params![group.name],
                |r| r.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE presentation_group SET name = ?1, inherits_from = ?2, parent = ?3, \
                     elements_json = ?4 WHERE id = ?5",
                    params![group.name, group.inherits_from, group.parent, elements_json, id],
                )?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO presentation_group (name, inherits_from, parent, elements_json) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![group.name, group.inherits_from, group.parent, elements_json],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    fn write_data_source(&self, source: &DataSource) -> RepositoryResult<EntityId> {
        let members_json = serde_json::to_string(&source.members)?;
        let conn = self.get_conn()?;
        let existing: Option<EntityId> = conn
            .query_row(
                "SELECT id FROM data_source WHERE name = ?1",
                params![source.name],
                |r| r.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE data_source SET name = ?1, source_type = ?2, args = ?3, \
                     members_json = ?4 WHERE id = ?5",
                    params![source.name, source.source_type, source.args, members_json, id],
                )?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO data_source (name, source_type, args, members_json) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![source.name, source.source_type, source.args, members_json],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    fn write_routing_spec(&self, spec: &RoutingSpec) -> RepositoryResult<EntityId> {
        let nls_json = serde_json::to_string(&spec.network_lists)?;
        let props_json = serde_json::to_string(&spec.properties)?;
        let conn = self.get_conn()?;
        let existing: Option<EntityId> = conn
            .query_row(
                "SELECT id FROM routing_spec WHERE name = ?1",
                params![spec.name],
                |r| r.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE routing_spec SET name = ?1, data_source_name = ?2, \
                     network_lists_json = ?3, consumer_type = ?4, consumer_arg = ?5, \
                     since_time = ?6, until_time = ?7, enable_equations = ?8, \
                     properties_json = ?9 WHERE id = ?10",
                    params![
                        spec.name,
                        spec.data_source_name,
                        nls_json,
                        spec.consumer_type,
                        spec.consumer_arg,
                        spec.since_time,
                        spec.until_time,
                        spec.enable_equations,
                        props_json,
                        id
                    ],
                )?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO routing_spec (name, data_source_name, network_lists_json, \
                     consumer_type, consumer_arg, since_time, until_time, enable_equations, \
                     properties_json) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        spec.name,
                        spec.data_source_name,
                        nls_json,
                        spec.consumer_type,
                        spec.consumer_arg,
                        spec.since_time,
                        spec.until_time,
                        spec.enable_equations,
                        props_json
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    fn write_loading_app(&self, app: &CompAppInfo) -> RepositoryResult<EntityId> {
        let props_json = serde_json::to_string(&app.properties)?;
        let conn = self.get_conn()?;
        let existing: Option<EntityId> = conn
            .query_row(
                "SELECT id FROM loading_app WHERE app_name = ?1",
                params![app.app_name],
                |r| r.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE loading_app SET app_name = ?1, comment = ?2, properties_json = ?3 \
                     WHERE id = ?4",
                    params![app.app_name, app.comment, props_json, id],
                )?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO loading_app (app_name, comment, properties_json) \
                     VALUES (?1, ?2, ?3)",
                    params![app.app_name, app.comment, props_json],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    fn write_schedule_entry(&self, entry: &ScheduleEntry) -> RepositoryResult<EntityId> {
        let start = timestamp_to_text(entry.start_time);
        let conn = self.get_conn()?;
        let existing: Option<EntityId> = conn
            .query_row(
                "SELECT id FROM schedule_entry WHERE name = ?1",
                params![entry.name],
                |r| r.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE schedule_entry SET name = ?1, loading_app_name = ?2, \
                     routing_spec_name = ?3, enabled = ?4, start_time = ?5, run_interval = ?6 \
                     WHERE id = ?7",
                    params![
                        entry.name,
                        entry.loading_app_name,
                        entry.routing_spec_name,
                        entry.enabled,
                        start,
                        entry.run_interval,
                        id
                    ],
                )?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO schedule_entry (name, loading_app_name, routing_spec_name, \
                     enabled, start_time, run_interval) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        entry.name,
                        entry.loading_app_name,
                        entry.routing_spec_name,
                        entry.enabled,
                        start,
                        entry.run_interval
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    fn write_enum_list(&self, enums: &[DbEnum]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM db_enum", [])?;
        for e in enums {
            let values_json = serde_json::to_string(&e.values)?;
            conn.execute(
                "INSERT INTO db_enum (name, default_value, values_json) VALUES (?1, ?2, ?3)",
                params![e.name, e.default_value, values_json],
            )?;
        }
        Ok(())
    }

    fn write_unit_set(
        &self,
        units: &[EngineeringUnit],
        converters: &[UnitConverter],
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM engineering_unit", [])?;
        conn.execute("DELETE FROM unit_converter", [])?;
        for eu in units {
            conn.execute(
                "INSERT INTO engineering_unit (abbr, name, family, measures) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![eu.abbr, eu.name, eu.family, eu.measures],
            )?;
        }
        for uc in converters {
            let coeff_json = serde_json::to_string(&uc.coefficients)?;
            conn.execute(
                "INSERT INTO unit_converter (from_abbr, to_abbr, algorithm, coefficients_json) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![uc.from_abbr, uc.to_abbr, uc.algorithm, coeff_json],
            )?;
        }
        Ok(())
    }

    fn write_equivalences(&self, groups: &[Vec<DataTypeKey>]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM data_type_equivalence", [])?;
        for group in groups {
            let group_json = serde_json::to_string(group)?;
            conn.execute(
                "INSERT INTO data_type_equivalence (group_json) VALUES (?1)",
                params![group_json],
            )?;
        }
        Ok(())
    }

    fn write_platform_index(&self, platforms: &[Platform]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM platform_index", [])?;
        for p in platforms {
            let Some(id) = p.id else {
                // 未写入的平台（如无介质被跳过）不进索引
                continue;
            };
            let media_json = serde_json::to_string(&p.transport_media)?;
            conn.execute(
                "INSERT INTO platform_index (platform_id, display_name, media_json) \
                 VALUES (?1, ?2, ?3)",
                params![id, p.display_name(), media_json],
            )?;
        }
        Ok(())
    }

    fn write_intervals(&self, intervals: &[IntervalRecord]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        for iv in intervals {
            conn.execute(
                "INSERT INTO interval_record (name, cal_constant, cal_multiplier) \
                 VALUES (?1, ?2, ?3) \
                 ON CONFLICT(name) DO UPDATE SET cal_constant = ?2, cal_multiplier = ?3",
                params![iv.name, iv.cal_constant, iv.cal_multiplier],
            )?;
        }
        Ok(())
    }

    fn delete_all_schedule_entries(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM schedule_entry", [])?)
    }

    fn delete_all_routing_specs(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM routing_spec", [])?)
    }

    fn delete_all_data_sources(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM data_source", [])?)
    }

    fn delete_all_network_lists(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM network_list", [])?)
    }

    fn delete_all_platforms(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n = conn.execute("DELETE FROM platform", [])?;
        conn.execute("DELETE FROM platform_index", [])?;
        Ok(n)
    }

    fn delete_all_platform_configs(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM platform_config", [])?)
    }

    fn delete_all_equipment_models(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM equipment_model", [])?)
    }

    fn clear_setup_tables(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM engineering_unit", [])?;
        conn.execute("DELETE FROM unit_converter", [])?;
        conn.execute("DELETE FROM data_type_equivalence", [])?;
        conn.execute("DELETE FROM db_enum", [])?;
        Ok(())
    }
}
