// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod tests {
    use crate::client::ProvisioningState;

    #[test]
    fn test_terminal_states_parse() {
        assert_eq!(
            ProvisioningState::from_remote("Succeeded"),
            ProvisioningState::Succeeded
        );
        assert_eq!(
            ProvisioningState::from_remote("Failed"),
            ProvisioningState::Failed
        );
        assert_eq!(
            ProvisioningState::from_remote("Canceled"),
            ProvisioningState::Canceled
        );
        assert_eq!(
            ProvisioningState::from_remote("cancelled"),
            ProvisioningState::Canceled
        );
    }

    #[test]
    fn test_non_terminal_states_collapse_to_pending() {
        for raw in ["Creating", "Updating", "Deleting", "", "Whatever"] {
            let state = ProvisioningState::from_remote(raw);
            assert_eq!(state, ProvisioningState::Pending, "state {raw:?}");
            assert!(!state.is_terminal());
        }
    }
}
