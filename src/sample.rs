//! Built-in sample schema and handlers.
//!
//! Used by the binary when the configuration declares no model, and as the
//! shared fixture for routing tests.
//!
//! ```text
//! Customers        key (Id: int32)
//! Orders           key (Id: int32)
//! ComplexKeyTypes  key (SectionNumber: int32, SectionSpot: int32)
//!     BestComplexKeyType(value: int32, multiplier: int32)
//!     BestComplexKeyType(something: string)
//!     BestComplexKeyType(something: int32)   no handler
//! ```

use serde_json::{json, Value as Json};

use crate::dispatch::{HandlerError, HandlerRegistry};
use crate::model::{Collection, Operation, ScalarType, Schema, SchemaError};
use crate::routing::HandlerDescriptor;

const CUSTOMERS: &[(i32, &str)] = &[(1, "Ada"), (2, "Grace"), (3, "Linus")];
const ORDERS: &[(i32, i32)] = &[(10, 1), (11, 1), (12, 3)];

pub fn sample_schema() -> Result<Schema, Vec<SchemaError>> {
    Schema::builder()
        .collection(Collection::new("Customers").key("Id", ScalarType::Int32))
        .collection(Collection::new("Orders").key("Id", ScalarType::Int32))
        .collection(
            Collection::new("ComplexKeyTypes")
                .key("SectionNumber", ScalarType::Int32)
                .key("SectionSpot", ScalarType::Int32)
                .operation(
                    Operation::new("BestComplexKeyType")
                        .parameter("value", ScalarType::Int32)
                        .parameter("multiplier", ScalarType::Int32),
                )
                .operation(Operation::new("BestComplexKeyType").parameter("something", ScalarType::String))
                .operation(Operation::new("BestComplexKeyType").parameter("something", ScalarType::Int32)),
        )
        .build()
}

pub fn sample_registry() -> HandlerRegistry {
    HandlerRegistry::new()
        .handler("CustomersHandler", HandlerDescriptor::new("Get"), |_| {
            Ok(Json::Array(CUSTOMERS.iter().map(|&(id, name)| customer(id, name)).collect()))
        })
        .handler(
            "CustomersHandler",
            HandlerDescriptor::new("Get").param("id", ScalarType::Int32),
            |call| {
                let id = call.int32("id")?;
                CUSTOMERS
                    .iter()
                    .find(|&&(c, _)| c == id)
                    .map(|&(id, name)| customer(id, name))
                    .ok_or_else(|| HandlerError::NotFound(call.path.to_string()))
            },
        )
        .handler("OrdersHandler", HandlerDescriptor::new("Get"), |_| {
            Ok(Json::Array(ORDERS.iter().map(|&(id, c)| order(id, c)).collect()))
        })
        .handler(
            "OrdersHandler",
            HandlerDescriptor::new("Get").param("id", ScalarType::Int32),
            |call| {
                let id = call.int32("id")?;
                ORDERS
                    .iter()
                    .find(|&&(o, _)| o == id)
                    .map(|&(id, c)| order(id, c))
                    .ok_or_else(|| HandlerError::NotFound(call.path.to_string()))
            },
        )
        .handler(
            "ComplexKeyTypesHandler",
            HandlerDescriptor::new("Get")
                .param("sectionNumber", ScalarType::Int32)
                .param("sectionSpot", ScalarType::Int32),
            |call| Ok(complex_key(call.int32("sectionNumber")?, call.int32("sectionSpot")?)),
        )
        .handler(
            "ComplexKeyTypesHandler",
            HandlerDescriptor::new("BestComplexKeyType")
                .param("value", ScalarType::Int32)
                .param("multiplier", ScalarType::Int32),
            |call| {
                let product = call
                    .int32("value")?
                    .checked_mul(call.int32("multiplier")?)
                    .ok_or_else(|| HandlerError::Rejected("value * multiplier overflows int32".into()))?;
                Ok(complex_key(product, product))
            },
        )
        .handler(
            "ComplexKeyTypesHandler",
            HandlerDescriptor::new("BestComplexKeyType").param("something", ScalarType::String),
            |call| {
                let value = match call.string("something")? {
                    "lots" => 9,
                    "little" => 3,
                    _ => -1,
                };
                Ok(complex_key(value, value))
            },
        )
}

fn customer(id: i32, name: &str) -> Json {
    json!({ "Id": id, "Name": name })
}

fn order(id: i32, customer_id: i32) -> Json {
    json!({ "Id": id, "CustomerId": customer_id })
}

fn complex_key(section_number: i32, section_spot: i32) -> Json {
    json!({ "SectionNumber": section_number, "SectionSpot": section_spot })
}
