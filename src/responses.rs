use atat::atat_derive::AtatResp;

/// Commands which gets just responded by OK.
/// Responses are matched on the raw stream by the driver, so this is just required for deriving commands.
#[derive(Clone, AtatResp)]
pub struct NoResponse;
