//! Booking status transition table
//!
//! The provider drives forward progress (confirm/reject a request, start
//! work, mark complete); the client keeps a unilateral cancellation right
//! before completion, and either party may cancel a confirmed booking.
//! The table is sparse: any pair absent from it is forbidden for everyone,
//! and the three terminal statuses have no outbound transitions at all.

use crate::models::BookingStatus;

/// Whether the caller may move a booking from `from` to `to`, given which
/// of the two owning parties the caller is.
pub fn can_transition(
    from: BookingStatus,
    to: BookingStatus,
    is_client: bool,
    is_provider: bool,
) -> bool {
    use BookingStatus::*;

    match (from, to) {
        (Pending, Confirmed) | (Pending, Rejected) => is_provider,
        (Pending, Cancelled) => is_client,
        (Confirmed, InProgress) => is_provider,
        (Confirmed, Cancelled) => is_client || is_provider,
        (InProgress, Completed) => is_provider,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    const CLIENT: (bool, bool) = (true, false);
    const PROVIDER: (bool, bool) = (false, true);

    fn allowed_for(from: BookingStatus, to: BookingStatus, (c, p): (bool, bool)) -> bool {
        can_transition(from, to, c, p)
    }

    #[test]
    fn provider_drives_forward_progress() {
        assert!(allowed_for(Pending, Confirmed, PROVIDER));
        assert!(allowed_for(Pending, Rejected, PROVIDER));
        assert!(allowed_for(Confirmed, InProgress, PROVIDER));
        assert!(allowed_for(InProgress, Completed, PROVIDER));

        assert!(!allowed_for(Pending, Confirmed, CLIENT));
        assert!(!allowed_for(Pending, Rejected, CLIENT));
        assert!(!allowed_for(Confirmed, InProgress, CLIENT));
        assert!(!allowed_for(InProgress, Completed, CLIENT));
    }

    #[test]
    fn client_cancels_pending_provider_does_not() {
        assert!(allowed_for(Pending, Cancelled, CLIENT));
        assert!(!allowed_for(Pending, Cancelled, PROVIDER));
    }

    #[test]
    fn either_party_cancels_confirmed() {
        assert!(allowed_for(Confirmed, Cancelled, CLIENT));
        assert!(allowed_for(Confirmed, Cancelled, PROVIDER));
    }

    #[test]
    fn terminal_statuses_have_no_outbound_transitions() {
        for from in [Completed, Cancelled, Rejected] {
            for to in BookingStatus::ALL {
                assert!(
                    !can_transition(from, to, true, true),
                    "{from} -> {to} must be forbidden"
                );
            }
        }
    }

    #[test]
    fn nothing_transitions_back_into_pending() {
        for from in BookingStatus::ALL {
            assert!(!can_transition(from, Pending, true, true));
        }
    }

    #[test]
    fn pairs_absent_from_the_table_are_forbidden_for_everyone() {
        // Mirror of the table: the only allowed (from, to) pairs.
        let table = [
            (Pending, Confirmed),
            (Pending, Rejected),
            (Pending, Cancelled),
            (Confirmed, InProgress),
            (Confirmed, Cancelled),
            (InProgress, Completed),
        ];

        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                if table.contains(&(from, to)) {
                    continue;
                }
                for (c, p) in [(false, false), CLIENT, PROVIDER, (true, true)] {
                    assert!(
                        !can_transition(from, to, c, p),
                        "{from} -> {to} must be forbidden regardless of caller"
                    );
                }
            }
        }
    }

    #[test]
    fn non_owner_is_never_allowed() {
        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                assert!(!can_transition(from, to, false, false));
            }
        }
    }
}
