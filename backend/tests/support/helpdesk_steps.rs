//! Steps shared by every helpdesk behaviour suite.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use rstest_bdd_macros::{given, then};
use serde_json::Value;

use crate::helpdesk_world::{WorldFixture, last, register_account};

#[given("a running helpdesk")]
fn a_running_helpdesk(world: &WorldFixture) {
    let _ = world;
}

#[given("staff member {name} registers as {email}")]
fn staff_member_registers(world: &WorldFixture, name: String, email: String) {
    register_account(&world.world(), &name, &email, "KM-001");
    let role = last(&world.world()).body["role"].clone();
    assert_eq!(role, Value::from("staff"), "{email} should be on the staff list");
}

#[given("guest {name} registers as {email} for product {product}")]
fn guest_registers(world: &WorldFixture, name: String, email: String, product: String) {
    register_account(&world.world(), &name, &email, &product);
    let role = last(&world.world()).body["role"].clone();
    assert_eq!(role, Value::from("guest"));
}

#[then("the response status is {status} with code {code}")]
fn the_response_status_is(world: &WorldFixture, status: u16, code: String) {
    let captured = last(&world.world());
    assert_eq!(captured.status, status, "body: {:?}", captured.body);
    assert_eq!(
        captured.body.get("code").and_then(Value::as_str),
        Some(code.as_str())
    );
}
