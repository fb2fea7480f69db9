// ==========================================
// 环境监测配置管理系统 - XML 交换文件读取器
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 3. 交换格式
// 格式: 每文件一个顶层元素; 名称/ID 为属性, 标量字段为子元素,
//       从属对象嵌套 (Platform 内嵌 Site/PlatformConfig/TransportMedium)
// 说明: 元素过滤谓词作用于根标签, 被拒元素不构建任何对象
// ==========================================

use crate::domain::config::{ConfigSensor, EquipmentModel, PlatformConfig};
use crate::domain::data_type::DataTypeKey;
use crate::domain::enums::{DbEnum, EnumValue};
use crate::domain::platform::{Platform, TransportMedium};
use crate::domain::presentation::{DataPresentation, PresentationGroup};
use crate::domain::routing::{DataSource, NetworkList, NetworkListEntry, RoutingSpec};
use crate::domain::schedule::{CompAppInfo, IntervalRecord, ScheduleEntry};
use crate::domain::site::{Site, SiteName};
use crate::domain::types::{ElementFilter, ElementKind};
use crate::domain::units::{EngineeringUnit, UnitConverter};
use crate::importer::error::{ImportError, ImportResult};
use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::path::Path;
use tracing::warn;

// ==========================================
// ParsedElement - 顶层元素标签联合
// ==========================================
// 红线: 装配器对该联合做单一穷尽 match 完成路由
#[derive(Debug, Clone)]
pub enum ParsedElement {
    Platform(Platform),
    Site(Site),
    /// 路由规范文件内嵌数据源定义, 随规范一并提升到暂存库
    RoutingSpec {
        spec: RoutingSpec,
        data_sources: Vec<DataSource>,
    },
    NetworkList(NetworkList),
    PresentationGroup(PresentationGroup),
    ScheduleEntry(ScheduleEntry),
    CompAppInfo(CompAppInfo),
    PlatformConfig(PlatformConfig),
    EquipmentModel(EquipmentModel),
    EnumList(Vec<DbEnum>),
    EngineeringUnitList {
        units: Vec<EngineeringUnit>,
        converters: Vec<UnitConverter>,
    },
    DataTypeEquivalenceList(Vec<Vec<DataTypeKey>>),
    IntervalList(Vec<IntervalRecord>),
    /// 平台清单文件（由装配器判为致命领域错误）
    PlatformList,
    /// 被元素过滤谓词拒绝, 未构建对象
    Skipped(ElementKind),
}

// ==========================================
// 轻量 DOM 节点
// ==========================================
// 说明: 交换文件体量小（每文件一个顶层对象）, 先建树再走访
// 比逐事件手写状态机更稳, 错误定位也更直接
#[derive(Debug, Clone, Default)]
struct XmlNode {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn require_attr(&self, name: &str) -> ImportResult<String> {
        self.attr(name)
            .map(|v| v.to_string())
            .ok_or_else(|| ImportError::MissingAttribute {
                element: self.tag.clone(),
                attribute: name.to_string(),
            })
    }

    fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.tag.eq_ignore_ascii_case(tag))
    }

    fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children
            .iter()
            .filter(move |c| c.tag.eq_ignore_ascii_case(tag))
    }

    /// 子元素文本（trim 后为空视为缺失）
    fn child_text(&self, tag: &str) -> Option<String> {
        self.child(tag).and_then(|c| {
            let t = c.text.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
    }
}

/// 解析整个文档为节点树（根元素）
fn parse_document(content: &str, path: &str) -> ImportResult<XmlNode> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let mut node = XmlNode {
                    tag: String::from_utf8_lossy(e.name().as_ref()).to_string(),
                    ..Default::default()
                };
                for attr in e.attributes().flatten() {
                    node.attrs.push((
                        String::from_utf8_lossy(attr.key.as_ref()).to_string(),
                        String::from_utf8_lossy(&attr.value).to_string(),
                    ));
                }
                stack.push(node);
            }
            Ok(Event::Empty(ref e)) => {
                let mut node = XmlNode {
                    tag: String::from_utf8_lossy(e.name().as_ref()).to_string(),
                    ..Default::default()
                };
                for attr in e.attributes().flatten() {
                    node.attrs.push((
                        String::from_utf8_lossy(attr.key.as_ref()).to_string(),
                        String::from_utf8_lossy(&attr.value).to_string(),
                    ));
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&e.xml_content().unwrap_or_default());
                }
            }
            Ok(Event::End(_)) => {
                let node = stack.pop().ok_or_else(|| ImportError::XmlParseError {
                    path: path.to_string(),
                    message: "结束标签与开始标签不配对".to_string(),
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ImportError::XmlParseError {
                    path: path.to_string(),
                    message: e.to_string(),
                })
            }
        }
        buf.clear();
    }

    root.ok_or_else(|| ImportError::XmlParseError {
        path: path.to_string(),
        message: "文档没有顶层元素".to_string(),
    })
}

/// 仅读出根元素标签（过滤判定用, 不构建树）
fn peek_root_tag(content: &str, path: &str) -> ImportResult<String> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                return Ok(String::from_utf8_lossy(e.name().as_ref()).to_string());
            }
            Ok(Event::Eof) => {
                return Err(ImportError::XmlParseError {
                    path: path.to_string(),
                    message: "文档没有顶层元素".to_string(),
                })
            }
            Ok(_) => {}
            Err(e) => {
                return Err(ImportError::XmlParseError {
                    path: path.to_string(),
                    message: e.to_string(),
                })
            }
        }
        buf.clear();
    }
}

// ==========================================
// 读取入口
// ==========================================

/// 读取单个交换文件, 产出顶层元素
///
/// 过滤谓词在根标签识别后、元素体构建前生效
pub fn read_element_file(path: &Path, filter: &ElementFilter) -> ImportResult<ParsedElement> {
    let path_str = path.display().to_string();
    if !path.exists() {
        return Err(ImportError::FileNotFound(path_str));
    }
    let content = fs::read_to_string(path).map_err(|e| ImportError::FileReadError {
        path: path_str.clone(),
        message: e.to_string(),
    })?;

    let root_tag = peek_root_tag(&content, &path_str)?;
    let kind = ElementKind::from_tag(&root_tag).ok_or_else(|| ImportError::UnknownTopElement {
        path: path_str.clone(),
        tag: root_tag.clone(),
    })?;

    if kind == ElementKind::PlatformList {
        return Ok(ParsedElement::PlatformList);
    }
    if !filter(kind) {
        return Ok(ParsedElement::Skipped(kind));
    }

    let root = parse_document(&content, &path_str)?;
    build_element(kind, &root)
}

/// 根据元素类型分发到对应构建器（单一穷尽 match）
fn build_element(kind: ElementKind, node: &XmlNode) -> ImportResult<ParsedElement> {
    match kind {
        ElementKind::Platform => Ok(ParsedElement::Platform(build_platform(node)?)),
        ElementKind::Site => Ok(ParsedElement::Site(build_site(node)?)),
        ElementKind::RoutingSpec => {
            let (spec, data_sources) = build_routing_spec(node)?;
            Ok(ParsedElement::RoutingSpec { spec, data_sources })
        }
        ElementKind::NetworkList => Ok(ParsedElement::NetworkList(build_network_list(node)?)),
        ElementKind::PresentationGroup => {
            Ok(ParsedElement::PresentationGroup(build_presentation_group(node)?))
        }
        ElementKind::ScheduleEntry => Ok(ParsedElement::ScheduleEntry(build_schedule_entry(node)?)),
        ElementKind::CompAppInfo => Ok(ParsedElement::CompAppInfo(build_comp_app_info(node)?)),
        ElementKind::PlatformConfig => {
            Ok(ParsedElement::PlatformConfig(build_platform_config(node)?))
        }
        ElementKind::EquipmentModel => {
            Ok(ParsedElement::EquipmentModel(build_equipment_model(node)?))
        }
        ElementKind::EnumList => Ok(ParsedElement::EnumList(build_enum_list(node)?)),
        ElementKind::EngineeringUnitList => {
            let (units, converters) = build_unit_list(node)?;
            Ok(ParsedElement::EngineeringUnitList { units, converters })
        }
        ElementKind::DataTypeEquivalenceList => Ok(ParsedElement::DataTypeEquivalenceList(
            build_equivalence_list(node)?,
        )),
        ElementKind::IntervalList => Ok(ParsedElement::IntervalList(build_interval_list(node)?)),
        ElementKind::PlatformList => Ok(ParsedElement::PlatformList),
    }
}

// ==========================================
// 字段解析辅助
// ==========================================

fn parse_timestamp(node: &XmlNode, field: &str, value: &str) -> ImportResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ImportError::InvalidFieldValue {
            element: node.tag.clone(),
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn parse_i32(node: &XmlNode, field: &str, value: &str) -> ImportResult<i32> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| ImportError::InvalidFieldValue {
            element: node.tag.clone(),
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn parse_f64(node: &XmlNode, field: &str, value: &str) -> ImportResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ImportError::InvalidFieldValue {
            element: node.tag.clone(),
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn child_timestamp(node: &XmlNode, tag: &str) -> ImportResult<Option<DateTime<Utc>>> {
    match node.child_text(tag) {
        Some(v) => Ok(Some(parse_timestamp(node, tag, &v)?)),
        None => Ok(None),
    }
}

fn child_i32(node: &XmlNode, tag: &str) -> ImportResult<Option<i32>> {
    match node.child_text(tag) {
        Some(v) => Ok(Some(parse_i32(node, tag, &v)?)),
        None => Ok(None),
    }
}

// ==========================================
// 实体构建器
// ==========================================

fn build_site(node: &XmlNode) -> ImportResult<Site> {
    let mut site = Site::new();
    for name_node in node.children_named("SiteName") {
        let name_type = name_node.require_attr("nameType")?;
        let value = name_node.text.trim().to_string();
        if value.is_empty() {
            return Err(ImportError::InvalidFieldValue {
                element: "SiteName".to_string(),
                field: "value".to_string(),
                value: String::new(),
            });
        }
        let mut sn = SiteName::new(name_type, value);
        sn.agency_code = name_node.attr("agencyCode").map(|s| s.to_string());
        site.add_name(sn);
    }
    site.description = node.child_text("Description");
    if let Some(v) = node.child_text("Elevation") {
        site.elevation = Some(parse_f64(node, "Elevation", &v)?);
    }
    site.timezone = node.child_text("Timezone");
    Ok(site)
}

fn build_equipment_model(node: &XmlNode) -> ImportResult<EquipmentModel> {
    let mut em = EquipmentModel::named(node.require_attr("name")?);
    em.company = node.child_text("Company");
    em.model = node.child_text("Model");
    em.description = node.child_text("Description");
    em.equipment_type = node.child_text("EquipmentType");
    Ok(em)
}

fn build_data_type_key(node: &XmlNode) -> ImportResult<DataTypeKey> {
    Ok(DataTypeKey::new(
        node.require_attr("standard")?,
        node.require_attr("code")?,
    ))
}

fn build_platform_config(node: &XmlNode) -> ImportResult<PlatformConfig> {
    let mut config = PlatformConfig::named(node.require_attr("name")?);
    config.description = node.child_text("Description");
    if let Some(em_node) = node.child("EquipmentModel") {
        config.equipment_model = Some(build_equipment_model(em_node)?);
    }
    for sensor_node in node.children_named("ConfigSensor") {
        let number = parse_i32(
            sensor_node,
            "sensorNumber",
            &sensor_node.require_attr("sensorNumber")?,
        )?;
        let mut sensor = ConfigSensor::new(number, sensor_node.require_attr("sensorName")?);
        for dt_node in sensor_node.children_named("DataType") {
            sensor.data_types.push(build_data_type_key(dt_node)?);
        }
        if let Some(em_node) = sensor_node.child("EquipmentModel") {
            sensor.equipment_model = Some(build_equipment_model(em_node)?);
        }
        sensor.recording_interval = child_i32(sensor_node, "RecordingInterval")?;
        config.sensors.push(sensor);
    }
    Ok(config)
}

fn build_transport_medium(node: &XmlNode) -> ImportResult<TransportMedium> {
    let mut tm = TransportMedium::new(
        node.require_attr("mediumType")?,
        node.require_attr("mediumId")?,
    );
    tm.channel = child_i32(node, "Channel")?;
    tm.expiration = child_timestamp(node, "Expiration")?;
    if let Some(em_node) = node.child("EquipmentModel") {
        tm.equipment_model = Some(build_equipment_model(em_node)?);
    }
    Ok(tm)
}

fn build_platform(node: &XmlNode) -> ImportResult<Platform> {
    let mut platform = Platform::new();
    platform.designator = node.attr("designator").map(|s| s.to_string());
    platform.description = node.child_text("Description");
    platform.owner_agency = node.child_text("Agency");
    platform.expiration = child_timestamp(node, "Expiration")?;
    if let Some(site_node) = node.child("Site") {
        platform.site = Some(build_site(site_node)?);
    }
    if let Some(config_node) = node.child("PlatformConfig") {
        platform.config = Some(build_platform_config(config_node)?);
    } else if let Some(name) = node.child_text("PlatformConfigName") {
        // 仅按名称引用既有配置（软链接）
        platform.config_name = Some(name);
    }
    for tm_node in node.children_named("TransportMedium") {
        platform.transport_media.push(build_transport_medium(tm_node)?);
    }
    Ok(platform)
}

fn build_network_list(node: &XmlNode) -> ImportResult<NetworkList> {
    let mut nl = NetworkList::named(node.require_attr("name")?);
    nl.transport_medium_type = node.child_text("TransportMediumType");
    nl.site_name_type_preference = node.child_text("SiteNameTypePreference");
    for entry_node in node.children_named("NetworkListEntry") {
        nl.entries.push(NetworkListEntry {
            transport_id: entry_node.require_attr("transportId")?,
            platform_name: entry_node.attr("platformName").map(|s| s.to_string()),
            description: entry_node.child_text("Description"),
        });
    }
    Ok(nl)
}

/// 解析内嵌数据源定义; 组类型成员以嵌套 DataSource 元素表达,
/// 成员定义与外层定义一并提升
fn build_data_source(node: &XmlNode, out: &mut Vec<DataSource>) -> ImportResult<String> {
    let mut ds = DataSource::named(node.require_attr("name")?, node.require_attr("type")?);
    ds.args = node.child_text("DataSourceArg");
    for member_node in node.children_named("DataSource") {
        let member_name = build_data_source(member_node, out)?;
        ds.members.push(member_name);
    }
    let name = ds.name.clone();
    out.push(ds);
    Ok(name)
}

fn build_routing_spec(node: &XmlNode) -> ImportResult<(RoutingSpec, Vec<DataSource>)> {
    let mut rs = RoutingSpec::named(node.require_attr("name")?);
    let mut data_sources = Vec::new();
    if let Some(ds_node) = node.child("DataSource") {
        rs.data_source_name = Some(build_data_source(ds_node, &mut data_sources)?);
    } else {
        rs.data_source_name = node.child_text("DataSourceName");
    }
    rs.consumer_type = node.child_text("ConsumerType");
    rs.consumer_arg = node.child_text("ConsumerArg");
    rs.since_time = node.child_text("SinceTime");
    rs.until_time = node.child_text("UntilTime");
    rs.enable_equations = node
        .child_text("EnableEquations")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    for nl_node in node.children_named("NetworkListName") {
        let name = nl_node.text.trim().to_string();
        if !name.is_empty() {
            rs.network_lists.push(name);
        }
    }
    for prop_node in node.children_named("Property") {
        let key = prop_node.require_attr("name")?;
        rs.properties.insert(key, prop_node.text.trim().to_string());
    }
    Ok((rs, data_sources))
}

fn build_presentation_group(node: &XmlNode) -> ImportResult<PresentationGroup> {
    let mut pg = PresentationGroup::named(node.require_attr("name")?);
    pg.inherits_from = node.child_text("InheritsFrom");
    for dp_node in node.children_named("DataPresentation") {
        let dt_node = dp_node
            .child("DataType")
            .ok_or_else(|| ImportError::MissingAttribute {
                element: "DataPresentation".to_string(),
                attribute: "DataType".to_string(),
            })?;
        pg.elements.push(DataPresentation {
            data_type: build_data_type_key(dt_node)?,
            units: dp_node.child_text("Units"),
            max_decimals: child_i32(dp_node, "MaxDecimals")?,
        });
    }
    Ok(pg)
}

fn build_schedule_entry(node: &XmlNode) -> ImportResult<ScheduleEntry> {
    let mut se = ScheduleEntry::named(node.require_attr("name")?);
    se.loading_app_name = node.child_text("LoadingAppName");
    se.routing_spec_name = node.child_text("RoutingSpecName");
    se.enabled = node
        .child_text("Enabled")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(true);
    se.start_time = child_timestamp(node, "StartTime")?;
    se.run_interval = node.child_text("RunInterval");
    Ok(se)
}

fn build_comp_app_info(node: &XmlNode) -> ImportResult<CompAppInfo> {
    let mut app = CompAppInfo::named(node.require_attr("name")?);
    app.comment = node.child_text("Comment");
    for prop_node in node.children_named("Property") {
        let key = prop_node.require_attr("name")?;
        app.properties.insert(key, prop_node.text.trim().to_string());
    }
    Ok(app)
}

fn build_enum_list(node: &XmlNode) -> ImportResult<Vec<DbEnum>> {
    let mut enums = Vec::new();
    for enum_node in node.children_named("Enum") {
        let mut e = DbEnum::named(enum_node.require_attr("name")?);
        e.default_value = enum_node.child_text("DefaultValue");
        for value_node in enum_node.children_named("EnumValue") {
            let mut ev = EnumValue::new(
                value_node.require_attr("value")?,
                value_node.child_text("Description"),
            );
            ev.exec_class = value_node.child_text("ExecClass");
            ev.edit_class = value_node.child_text("EditClass");
            ev.sort_number = child_i32(value_node, "SortNumber")?;
            e.values.push(ev);
        }
        enums.push(e);
    }
    Ok(enums)
}

fn build_unit_list(node: &XmlNode) -> ImportResult<(Vec<EngineeringUnit>, Vec<UnitConverter>)> {
    let mut units = Vec::new();
    let mut converters = Vec::new();
    for eu_node in node.children_named("EngineeringUnit") {
        let mut eu = EngineeringUnit::new(eu_node.require_attr("abbr")?);
        eu.name = eu_node.child_text("Name");
        eu.family = eu_node.child_text("Family");
        eu.measures = eu_node.child_text("Measures");
        units.push(eu);
    }
    for uc_node in node.children_named("UnitConverter") {
        let mut uc = UnitConverter::new(
            uc_node.require_attr("fromUnitsAbbr")?,
            uc_node.require_attr("toUnitsAbbr")?,
        );
        if let Some(algo) = uc_node.child_text("Algorithm") {
            uc.algorithm = algo;
        }
        for (i, tag) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            if let Some(v) = uc_node.child_text(tag) {
                uc.coefficients[i] = parse_f64(uc_node, tag, &v)?;
            }
        }
        converters.push(uc);
    }
    Ok((units, converters))
}

fn build_equivalence_list(node: &XmlNode) -> ImportResult<Vec<Vec<DataTypeKey>>> {
    let mut groups = Vec::new();
    for group_node in node.children_named("DataTypeEquivalence") {
        let mut group = Vec::new();
        for dt_node in group_node.children_named("DataType") {
            group.push(build_data_type_key(dt_node)?);
        }
        if group.len() < 2 {
            warn!("等价组成员不足 2 个, 忽略: {:?}", group);
            continue;
        }
        groups.push(group);
    }
    Ok(groups)
}

fn build_interval_list(node: &XmlNode) -> ImportResult<Vec<IntervalRecord>> {
    let mut intervals = Vec::new();
    for iv_node in node.children_named("Interval") {
        intervals.push(IntervalRecord {
            name: iv_node.require_attr("name")?,
            cal_constant: iv_node
                .child_text("CalConstant")
                .unwrap_or_else(|| "minute".to_string()),
            cal_multiplier: child_i32(iv_node, "CalMultiplier")?.unwrap_or(1),
        });
    }
    Ok(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accept_all(_: ElementKind) -> bool {
        true
    }

    fn parse_str(xml: &str) -> ParsedElement {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("xml_reader_test_{}.xml", std::process::id()));
        std::fs::write(&path, xml).unwrap();
        let result = read_element_file(&path, &accept_all);
        std::fs::remove_file(&path).ok();
        result.unwrap()
    }

    #[test]
    fn parses_site_with_names() {
        let el = parse_str(
            r#"<Site>
                 <SiteName nameType="usgs" agencyCode="USGS">12345678</SiteName>
                 <SiteName nameType="local">RIVERTON</SiteName>
                 <Description>河滨监测站</Description>
               </Site>"#,
        );
        match el {
            ParsedElement::Site(s) => {
                assert_eq!(s.names.len(), 2);
                assert_eq!(s.preferred_name().unwrap().value, "12345678");
                assert_eq!(s.names[0].agency_code.as_deref(), Some("USGS"));
                assert_eq!(s.description.as_deref(), Some("河滨监测站"));
            }
            other => panic!("期望 Site, 实际 {:?}", other),
        }
    }

    #[test]
    fn parses_platform_with_embedded_objects() {
        let el = parse_str(
            r#"<Platform designator="A">
                 <Site><SiteName nameType="local">S1</SiteName></Site>
                 <PlatformConfig name="cfg1">
                   <EquipmentModel name="SU8200"><Company>Sutron</Company></EquipmentModel>
                   <ConfigSensor sensorNumber="1" sensorName="STAGE">
                     <DataType standard="shef-pe" code="HG"/>
                   </ConfigSensor>
                 </PlatformConfig>
                 <TransportMedium mediumType="goes" mediumId="CE123456">
                   <Channel>99</Channel>
                 </TransportMedium>
               </Platform>"#,
        );
        match el {
            ParsedElement::Platform(p) => {
                assert_eq!(p.designator.as_deref(), Some("A"));
                assert!(p.site.is_some());
                let cfg = p.config.as_ref().unwrap();
                assert_eq!(cfg.name, "cfg1");
                assert_eq!(cfg.sensors.len(), 1);
                assert_eq!(cfg.sensors[0].data_types[0].code, "HG");
                assert_eq!(p.transport_media.len(), 1);
                assert_eq!(p.transport_media[0].channel, Some(99));
            }
            other => panic!("期望 Platform, 实际 {:?}", other),
        }
    }

    #[test]
    fn filter_skips_before_building() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("xml_filter_test_{}.xml", std::process::id()));
        std::fs::write(&path, "<RoutingSpec name=\"rs1\"></RoutingSpec>").unwrap();
        let reject_routing = |k: ElementKind| k.is_platform_related();
        let el = read_element_file(&path, &reject_routing).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(matches!(el, ParsedElement::Skipped(ElementKind::RoutingSpec)));
    }

    #[test]
    fn routing_spec_lifts_embedded_data_sources() {
        let el = parse_str(
            r#"<RoutingSpec name="rs1">
                 <DataSource name="group1" type="hostlist">
                   <DataSource name="lrgs1" type="lrgs"><DataSourceArg>host=a</DataSourceArg></DataSource>
                   <DataSource name="lrgs2" type="lrgs"><DataSourceArg>host=b</DataSourceArg></DataSource>
                 </DataSource>
                 <NetworkListName>nl1</NetworkListName>
               </RoutingSpec>"#,
        );
        match el {
            ParsedElement::RoutingSpec { spec, data_sources } => {
                assert_eq!(spec.data_source_name.as_deref(), Some("group1"));
                assert_eq!(data_sources.len(), 3);
                let group = data_sources.iter().find(|d| d.name == "group1").unwrap();
                assert_eq!(group.members, vec!["lrgs1", "lrgs2"]);
                assert_eq!(spec.network_lists, vec!["nl1"]);
            }
            other => panic!("期望 RoutingSpec, 实际 {:?}", other),
        }
    }

    #[test]
    fn platform_list_is_marked() {
        let el = parse_str("<PlatformList></PlatformList>");
        assert!(matches!(el, ParsedElement::PlatformList));
    }

    #[test]
    fn unknown_root_is_an_error() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("xml_unknown_test_{}.xml", std::process::id()));
        std::fs::write(&path, "<Bogus/>").unwrap();
        let err = read_element_file(&path, &accept_all).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ImportError::UnknownTopElement { .. }));
    }
}
