//! Contract interfaces: function fragments looked up by name or selector

use serde::Deserialize;

use crate::abi::{self, ParamType, Token};
use crate::AbiError;

/// Named function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, possibly empty
    pub name: String,
    /// Parameter type
    pub kind: ParamType,
}

impl Param {
    /// Create a parameter
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// One function of a contract interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionFragment {
    /// Function name
    pub name: String,
    /// Declared inputs
    pub inputs: Vec<Param>,
    /// Declared outputs
    pub outputs: Vec<Param>,
}

impl FunctionFragment {
    /// Create a fragment
    pub fn new(name: impl Into<String>, inputs: Vec<Param>, outputs: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
        }
    }

    /// Canonical signature such as `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(|p| p.kind.to_string()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// 4-byte selector
    pub fn selector(&self) -> [u8; 4] {
        abi::function_selector(&self.signature())
    }

    fn input_types(&self) -> Vec<ParamType> {
        self.inputs.iter().map(|p| p.kind.clone()).collect()
    }
}

/// A named contract interface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    name: String,
    constructor: Vec<Param>,
    functions: Vec<FunctionFragment>,
}

#[derive(Deserialize)]
struct JsonItem {
    #[serde(rename = "type", default = "default_item_type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<JsonParam>,
    #[serde(default)]
    outputs: Vec<JsonParam>,
}

#[derive(Deserialize)]
struct JsonParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    components: Vec<JsonParam>,
}

fn default_item_type() -> String {
    "function".to_string()
}

impl JsonParam {
    fn param_type(&self) -> Result<ParamType, AbiError> {
        match self.kind.strip_prefix("tuple") {
            Some(suffix) => {
                let members = self
                    .components
                    .iter()
                    .map(|c| c.param_type().map(|t| t.to_string()))
                    .collect::<Result<Vec<_>, _>>()?;
                format!("({}){}", members.join(","), suffix).parse()
            }
            None => self.kind.parse(),
        }
    }

    fn into_param(self) -> Result<Param, AbiError> {
        let kind = self.param_type()?;
        Ok(Param::new(self.name, kind))
    }
}

impl Interface {
    /// Create an empty interface
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Parse a standard JSON ABI array; entries other than functions and the
    /// constructor are ignored
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self, AbiError> {
        let items: Vec<JsonItem> =
            serde_json::from_str(json).map_err(|e| AbiError::Json(e.to_string()))?;

        let mut interface = Self::new(name);
        for item in items {
            let inputs = item
                .inputs
                .into_iter()
                .map(JsonParam::into_param)
                .collect::<Result<Vec<_>, _>>()?;
            match item.kind.as_str() {
                "constructor" => interface.constructor = inputs,
                "function" => {
                    let outputs = item
                        .outputs
                        .into_iter()
                        .map(JsonParam::into_param)
                        .collect::<Result<_, _>>()?;
                    interface.add_function(FunctionFragment::new(item.name, inputs, outputs));
                }
                _ => {}
            }
        }
        Ok(interface)
    }

    /// Add a function
    pub fn add_function(&mut self, function: FunctionFragment) {
        self.functions.push(function);
    }

    /// Add a function, builder style
    pub fn with_function(mut self, function: FunctionFragment) -> Self {
        self.add_function(function);
        self
    }

    /// Contract name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the constructor inputs, builder style
    pub fn with_constructor(mut self, inputs: Vec<Param>) -> Self {
        self.constructor = inputs;
        self
    }

    /// Constructor inputs
    pub fn constructor(&self) -> &[Param] {
        &self.constructor
    }

    /// Encode constructor arguments, to be appended to init code
    pub fn encode_constructor(&self, args: &[Token]) -> Result<Vec<u8>, AbiError> {
        let types: Vec<ParamType> = self.constructor.iter().map(|p| p.kind.clone()).collect();
        abi::encode(&types, args)
    }

    /// All functions
    pub fn functions(&self) -> &[FunctionFragment] {
        &self.functions
    }

    /// First function with this name
    pub fn function(&self, name: &str) -> Result<&FunctionFragment, AbiError> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| AbiError::UnknownFunction(name.to_string()))
    }

    /// Function whose selector starts `data`
    pub fn function_for_data(&self, data: &[u8]) -> Result<&FunctionFragment, AbiError> {
        let selector = data
            .get(..4)
            .ok_or_else(|| AbiError::Decode("call data shorter than a selector".to_string()))?;
        self.functions
            .iter()
            .find(|f| f.selector() == selector)
            .ok_or_else(|| AbiError::UnknownFunction(format!("0x{}", hex::encode(selector))))
    }

    /// Build call data for `name`
    pub fn encode_function_data(&self, name: &str, args: &[Token]) -> Result<Vec<u8>, AbiError> {
        let function = self.function(name)?;
        abi::encode_function_call(function.selector(), &function.input_types(), args)
    }

    /// Decode call data against `function`, checking its selector first
    pub fn decode_function_data(
        &self,
        function: &FunctionFragment,
        data: &[u8],
    ) -> Result<Vec<Token>, AbiError> {
        let expected = function.selector();
        let actual = data
            .get(..4)
            .ok_or_else(|| AbiError::Decode("call data shorter than a selector".to_string()))?;
        if actual != expected {
            return Err(AbiError::SelectorMismatch {
                function: function.name.clone(),
                expected: hex::encode(expected),
                actual: hex::encode(actual),
            });
        }
        abi::decode(&function.input_types(), &data[4..])
    }
}
