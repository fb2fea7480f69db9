// ==========================================
// 环境监测配置管理系统 - 数据类型等价关系
// ==========================================
// 说明: 等价关系用并查集表达（以 (standard, code) 为键的无向等价结构）,
//       取代环形链表表示法; 合并只增加等价断言, 从不撤销
// ==========================================

use crate::domain::types::name_key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// DataTypeKey - 数据类型键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DataTypeKey {
    pub standard: String, // 标准体系 (shef-pe/epa-code/cwms ...)
    pub code: String,     // 标准内编码
}

impl DataTypeKey {
    pub fn new(standard: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            standard: standard.into(),
            code: code.into(),
        }
    }

    /// 归一化键（大小写不敏感比较用）
    fn norm(&self) -> (String, String) {
        (name_key(&self.standard), name_key(&self.code))
    }
}

impl fmt::Display for DataTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.standard, self.code)
    }
}

// ==========================================
// EquivalenceSet - 无向等价结构（并查集）
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquivalenceSet {
    /// 归一化键 → 父节点; 不在表中的键视为自身单元素集合
    parent: BTreeMap<(String, String), (String, String)>,
    /// 归一化键 → 原始键（保留首次登记的拼写用于持久化/展示）
    display: BTreeMap<(String, String), DataTypeKey>,
}

impl EquivalenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记数据类型（不建立任何等价）
    pub fn register(&mut self, key: &DataTypeKey) {
        let n = key.norm();
        self.parent.entry(n.clone()).or_insert_with(|| n.clone());
        self.display.entry(n).or_insert_with(|| key.clone());
    }

    pub fn is_registered(&self, key: &DataTypeKey) -> bool {
        self.parent.contains_key(&key.norm())
    }

    fn find(&mut self, n: (String, String)) -> (String, String) {
        let p = match self.parent.get(&n) {
            Some(p) => p.clone(),
            None => {
                self.parent.insert(n.clone(), n.clone());
                return n;
            }
        };
        if p == n {
            return n;
        }
        let root = self.find(p);
        self.parent.insert(n, root.clone()); // 路径压缩
        root
    }

    /// 断言两个数据类型等价（幂等, 只增不减）
    pub fn assert_equivalence(&mut self, a: &DataTypeKey, b: &DataTypeKey) {
        self.register(a);
        self.register(b);
        let ra = self.find(a.norm());
        let rb = self.find(b.norm());
        if ra != rb {
            self.parent.insert(rb, ra);
        }
    }

    pub fn are_equivalent(&mut self, a: &DataTypeKey, b: &DataTypeKey) -> bool {
        if !self.is_registered(a) || !self.is_registered(b) {
            return false;
        }
        self.find(a.norm()) == self.find(b.norm())
    }

    /// 所有等价组（仅含成员数 ≥ 2 的组）, 成员按键序稳定输出
    pub fn groups(&mut self) -> Vec<Vec<DataTypeKey>> {
        let keys: Vec<(String, String)> = self.parent.keys().cloned().collect();
        let mut by_root: BTreeMap<(String, String), Vec<DataTypeKey>> = BTreeMap::new();
        for n in keys {
            let root = self.find(n.clone());
            if let Some(orig) = self.display.get(&n) {
                by_root.entry(root).or_default().push(orig.clone());
            }
        }
        by_root
            .into_values()
            .filter(|g| g.len() >= 2)
            .collect()
    }

    /// 已登记的所有数据类型键
    pub fn registered_keys(&self) -> Vec<DataTypeKey> {
        self.display.values().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.parent.clear();
        self.display.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalence_is_transitive_and_case_insensitive() {
        let mut s = EquivalenceSet::new();
        let a = DataTypeKey::new("shef-pe", "HG");
        let b = DataTypeKey::new("epa-code", "00065");
        let c = DataTypeKey::new("cwms", "Stage");
        s.assert_equivalence(&a, &b);
        s.assert_equivalence(&b, &c);
        assert!(s.are_equivalent(&a, &c));
        let a_lower = DataTypeKey::new("SHEF-PE", "hg");
        assert!(s.are_equivalent(&a_lower, &c));
    }

    #[test]
    fn groups_exclude_singletons() {
        let mut s = EquivalenceSet::new();
        s.register(&DataTypeKey::new("shef-pe", "PC"));
        s.assert_equivalence(
            &DataTypeKey::new("shef-pe", "HG"),
            &DataTypeKey::new("epa-code", "00065"),
        );
        let groups = s.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn assert_equivalence_is_idempotent() {
        let mut s = EquivalenceSet::new();
        let a = DataTypeKey::new("shef-pe", "HG");
        let b = DataTypeKey::new("epa-code", "00065");
        s.assert_equivalence(&a, &b);
        s.assert_equivalence(&b, &a);
        assert_eq!(s.groups().len(), 1);
    }
}
