//! Fusion function metadata
//!
//! Hand-authored table of the functions each supported Fusion release
//! exports, with the data needed to suggest and import them.

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Animation,
    Instances,
    State,
}

/// Which members of the enclosing class a special key accepts as its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterCompletion {
    /// Writable properties, e.g. `[OnChange "Text"]`, `[Out "Size"]`
    Properties,
    /// Events, e.g. `[OnEvent "Activated"]`
    Events,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    /// Field name on the Fusion module
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    /// Name the function is conventionally imported as, before casing
    pub import_title: &'static str,
    /// Path relative to the version's API reference root
    pub api_path: &'static str,
    /// Used as a special key inside a property table (`[Children]`)
    pub is_table_field: bool,
    /// Referenced, not called (`cleanup`, `[Children]`)
    pub dont_call: bool,
    /// Called with a string or table argument instead of parentheses (`New "Frame"`)
    pub no_parenthesis: bool,
    pub parameter_completion: Option<ParameterCompletion>,
}

#[derive(Debug)]
pub struct FusionVersion {
    pub version: &'static str,
    pub api_root: &'static str,
    pub functions: &'static [FunctionDefinition],
}

impl FusionVersion {
    pub fn function(&self, name: &str) -> Option<&'static FunctionDefinition> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Full documentation URL of `function`.
    pub fn api_url(&self, function: &FunctionDefinition) -> String {
        format!("{}{}", self.api_root, function.api_path)
    }
}

const fn function(
    name: &'static str,
    category: Category,
    description: &'static str,
    import_title: &'static str,
    api_path: &'static str,
) -> FunctionDefinition {
    FunctionDefinition {
        name,
        category,
        description,
        import_title,
        api_path,
        is_table_field: false,
        dont_call: false,
        no_parenthesis: false,
        parameter_completion: None,
    }
}

const fn table_field(mut def: FunctionDefinition) -> FunctionDefinition {
    def.is_table_field = true;
    def
}

const fn dont_call(mut def: FunctionDefinition) -> FunctionDefinition {
    def.dont_call = true;
    def
}

const fn no_parenthesis(mut def: FunctionDefinition) -> FunctionDefinition {
    def.no_parenthesis = true;
    def
}

const fn with_parameters(mut def: FunctionDefinition, kind: ParameterCompletion) -> FunctionDefinition {
    def.parameter_completion = Some(kind);
    def
}

static FUSION_0_2_FUNCTIONS: [FunctionDefinition; 18] = [
    function(
        "Computed",
        Category::State,
        "Calculates a single value based on the returned values from other state objects.",
        "Computed",
        "state/computed",
    ),
    dont_call(function(
        "cleanup",
        Category::State,
        "Attempts to destroy all destructible objects passed to it.",
        "clean",
        "state/cleanup",
    )),
    dont_call(function(
        "doNothing",
        Category::State,
        "No-op function - does nothing at all, and returns nothing at all. Intended for use as a destructor when no destruction is needed.",
        "doNothing",
        "state/doNothing",
    )),
    function(
        "ForKeys",
        Category::State,
        "Processes a table from another state object by transforming its keys only.",
        "ForKeys",
        "state/forkeys",
    ),
    function(
        "ForValues",
        Category::State,
        "Processes a table from another state object by transforming its values only.",
        "ForValues",
        "state/forvalues",
    ),
    function(
        "ForPairs",
        Category::State,
        "Processes a table from another state object by transforming its keys and values.",
        "ForPairs",
        "state/forpairs",
    ),
    function(
        "Observer",
        Category::State,
        "Observes various updates and events on a given dependency.",
        "Observer",
        "state/observer",
    ),
    function(
        "Value",
        Category::State,
        "Stores a single value which can be updated at any time.",
        "Value",
        "state/value",
    ),
    dont_call(table_field(function(
        "Children",
        Category::Instances,
        "Allows parenting children to an instance, both statically and dynamically.",
        "Children",
        "instances/children",
    ))),
    dont_call(table_field(function(
        "Cleanup",
        Category::Instances,
        "Cleans up all items given to it when the instance is destroyed, equivalent to passing the items to `Fusion.cleanup`.",
        "Cleanup",
        "instances/cleanup",
    ))),
    function(
        "Hydrate",
        Category::Instances,
        "Given an instance, returns a component which modifies that instance. The property table may specify properties to set on the instance, or include special keys for more advanced operations.",
        "Hydrate",
        "instances/hydrate",
    ),
    no_parenthesis(function(
        "New",
        Category::Instances,
        "Given a class name, returns a component which creates instances of that class. The property table may specify properties to set on the instance, or include special keys for more advanced operations.",
        "New",
        "instances/new",
    )),
    with_parameters(
        no_parenthesis(table_field(function(
            "OnChange",
            Category::Instances,
            "Given a property name, returns a special key which connects to that property's change events. It should be used with a handler callback, which may accept the new value of the property.",
            "Change",
            "instances/onchange",
        ))),
        ParameterCompletion::Properties,
    ),
    with_parameters(
        no_parenthesis(table_field(function(
            "OnEvent",
            Category::Instances,
            "Given an event name, returns a special key which connects to that event. It should be used with a handler callback, which may accept the arguments of the event.",
            "Event",
            "instances/onevent",
        ))),
        ParameterCompletion::Events,
    ),
    with_parameters(
        no_parenthesis(table_field(function(
            "Out",
            Category::Instances,
            "Given a property name, returns a special key which outputs the value of properties with that name. It should be used with a value.",
            "Out",
            "instances/out",
        ))),
        ParameterCompletion::Properties,
    ),
    table_field(function(
        "Ref",
        Category::Instances,
        "When applied to an instance, outputs the instance to a state object. It should be used with a value.",
        "Ref",
        "instances/ref",
    )),
    function(
        "Tween",
        Category::Animation,
        "Represents types that can be animated component-wise. If a data type can reasonably be represented as a fixed-length array of numbers, then it is animatable.",
        "Tween",
        "animation/tween",
    ),
    function(
        "Spring",
        Category::Animation,
        "Follows the value of another state object, as if linked by a damped spring. If the state object is not animatable, the spring will just snap to the goal value.",
        "Spring",
        "animation/spring",
    ),
];

/// Known releases, oldest first.
pub static FUSION_VERSIONS: &[FusionVersion] = &[FusionVersion {
    version: "0.2",
    api_root: "https://elttob.uk/Fusion/0.2/api-reference/",
    functions: &FUSION_0_2_FUNCTIONS,
}];

/// Looks up a release, falling back to the newest known one.
pub fn fusion_version(version: &str) -> &'static FusionVersion {
    if let Some(found) = FUSION_VERSIONS.iter().find(|v| v.version == version) {
        return found;
    }
    let latest = &FUSION_VERSIONS[FUSION_VERSIONS.len() - 1];
    warn!(
        "Unknown Fusion version {:?}, using {}",
        version, latest.version
    );
    latest
}
