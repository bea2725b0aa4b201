// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common fixtures for integration tests

#![allow(dead_code)]

use pe_dns_manager::zone_mapping::DnsZoneMapping;
use serde_json::{json, Value};

pub const SUBSCRIPTION: &str = "00000000-1111-2222-3333-444444444444";
pub const RESOURCE_GROUP: &str = "rg-network";
pub const ENDPOINT: &str = "pe-storage";

pub const BLOB_ZONE_ID: &str = "/subscriptions/99999999-0000-0000-0000-000000000000/resourceGroups/rg-dns/providers/Microsoft.Network/privateDnsZones/privatelink.blob.core.windows.net";
pub const TABLE_ZONE_ID: &str = "/subscriptions/99999999-0000-0000-0000-000000000000/resourceGroups/rg-dns/providers/Microsoft.Network/privateDnsZones/privatelink.table.core.windows.net";

/// Resource identifier of the test endpoint
pub fn endpoint_id() -> String {
    format!(
        "/subscriptions/{SUBSCRIPTION}/resourceGroups/{RESOURCE_GROUP}/providers/Microsoft.Network/privateEndpoints/{ENDPOINT}"
    )
}

/// Event payload whose connections carry the given group IDs, one list per connection
pub fn event_payload(connections: &[&[&str]]) -> Value {
    let connections: Vec<Value> = connections
        .iter()
        .map(|ids| json!({ "properties": { "groupIds": ids } }))
        .collect();

    json!({
        "eventType": "Microsoft.Network/privateEndpoints/write",
        "data": {
            "resourceInfo": {
                "id": endpoint_id(),
                "name": ENDPOINT,
                "properties": { "privateLinkServiceConnections": connections }
            }
        }
    })
}

/// Mapping for `blob` and `table`
pub fn storage_mapping() -> DnsZoneMapping {
    DnsZoneMapping::from_json_str(
        &json!({
            "privateDnsZoneMappings": {
                "blob": { "zoneName": "privatelink.blob.core.windows.net", "resourceId": BLOB_ZONE_ID },
                "table": { "zoneName": "privatelink.table.core.windows.net", "resourceId": TABLE_ZONE_ID }
            }
        })
        .to_string(),
    )
    .expect("fixture mapping must parse")
}
