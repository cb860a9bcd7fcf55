//! Flattened class table built from the API dump

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::model::{ApiClass, ApiDump, ClassMember};

/// Class name to member list, with inherited members copied down.
///
/// Members of the superclass chain come first, root-most first, followed by
/// the class's own members. Members tagged `ReadOnly` are dropped at every
/// level.
#[derive(Debug, Default, Clone)]
pub struct ClassDatabase {
    /// Class names in dump order.
    names: Vec<String>,
    members: HashMap<String, Vec<ClassMember>>,
}

impl ClassDatabase {
    pub fn from_dump(dump: &ApiDump) -> Self {
        let mut classes: HashMap<&str, &ApiClass> = HashMap::with_capacity(dump.classes.len());
        for class in &dump.classes {
            classes.entry(class.name.as_str()).or_insert(class);
        }

        let mut members: HashMap<String, Vec<ClassMember>> = HashMap::with_capacity(classes.len());
        let mut visiting = HashSet::new();
        let mut names = Vec::with_capacity(dump.classes.len());
        let mut seen = HashSet::new();

        for class in &dump.classes {
            if !seen.insert(class.name.as_str()) {
                // Duplicate entry, first one wins
                continue;
            }
            flatten(&class.name, &classes, &mut members, &mut visiting);
            names.push(class.name.clone());
        }

        debug!("Built class database with {} classes", names.len());
        Self { names, members }
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Flattened members of `class_name`; empty for unknown classes.
    pub fn members(&self, class_name: &str) -> &[ClassMember] {
        self.members.get(class_name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.members.contains_key(class_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn flatten(
    name: &str,
    classes: &HashMap<&str, &ApiClass>,
    resolved: &mut HashMap<String, Vec<ClassMember>>,
    visiting: &mut HashSet<String>,
) -> Option<Vec<ClassMember>> {
    if let Some(members) = resolved.get(name) {
        return Some(members.clone());
    }

    let class = classes.get(name)?;

    if !visiting.insert(name.to_string()) {
        warn!("Inheritance cycle through class {}", name);
        return None;
    }

    let mut members = class
        .superclass
        .as_deref()
        .and_then(|superclass| flatten(superclass, classes, resolved, visiting))
        .unwrap_or_default();

    members.extend(
        class
            .members
            .iter()
            .filter(|member| !member.is_read_only())
            .cloned(),
    );

    visiting.remove(name);
    resolved.insert(name.to_string(), members.clone());
    Some(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dump(value: serde_json::Value) -> ApiDump {
        serde_json::from_value(value).unwrap()
    }

    fn names(members: &[ClassMember]) -> Vec<&str> {
        members.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_superclass_members_come_first() {
        let db = ClassDatabase::from_dump(&dump(json!({
            "Classes": [
                { "Name": "Instance", "Superclass": "<<<ROOT>>>", "Members": [
                    { "Name": "Name", "MemberType": "Property", "ValueType": { "Name": "string" } },
                    { "Name": "ClassName", "MemberType": "Property", "ValueType": { "Name": "string" }, "Tags": ["ReadOnly", "NotReplicated"] }
                ]},
                { "Name": "GuiObject", "Superclass": "Instance", "Members": [
                    { "Name": "Size", "MemberType": "Property", "ValueType": { "Name": "UDim2" } }
                ]},
                { "Name": "Frame", "Superclass": "GuiObject", "Members": [
                    { "Name": "Style", "MemberType": "Property", "ValueType": { "Name": "FrameStyle" } }
                ]}
            ]
        })));

        assert_eq!(names(db.members("Frame")), vec!["Name", "Size", "Style"]);
        assert_eq!(names(db.members("Instance")), vec!["Name"]);
        assert_eq!(db.class_names().collect::<Vec<_>>(), vec!["Instance", "GuiObject", "Frame"]);
    }

    #[test]
    fn test_order_of_classes_in_dump_does_not_matter() {
        let db = ClassDatabase::from_dump(&dump(json!({
            "Classes": [
                { "Name": "Part", "Superclass": "BasePart", "Members": [
                    { "Name": "Shape", "MemberType": "Property" }
                ]},
                { "Name": "BasePart", "Superclass": "Instance", "Members": [
                    { "Name": "Anchored", "MemberType": "Property" },
                    { "Name": "Touched", "MemberType": "Event" }
                ]},
                { "Name": "Instance", "Superclass": "<<<ROOT>>>" }
            ]
        })));

        assert_eq!(names(db.members("Part")), vec!["Anchored", "Touched", "Shape"]);
        assert_eq!(db.len(), 3);
    }

    #[test]
    fn test_unknown_class_has_no_members() {
        let db = ClassDatabase::default();
        assert!(db.members("Frame").is_empty());
        assert!(!db.contains("Frame"));
        assert!(db.is_empty());
    }

    #[test]
    fn test_inheritance_cycle_terminates() {
        let db = ClassDatabase::from_dump(&dump(json!({
            "Classes": [
                { "Name": "A", "Superclass": "B", "Members": [{ "Name": "a", "MemberType": "Property" }] },
                { "Name": "B", "Superclass": "A", "Members": [{ "Name": "b", "MemberType": "Property" }] }
            ]
        })));

        assert_eq!(names(db.members("A")), vec!["b", "a"]);
        assert!(db.contains("B"));
    }
}
