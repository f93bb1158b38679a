// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! ARN decomposition
//!
//! Role identifiers are ARN-shaped strings. The only component the compiler
//! inspects is the account, for cross-account detection; everything else is
//! carried opaquely.

use crate::errors::{ForgeError, ForgeResult};

/// A parsed ARN-shaped identifier
///
/// `arn:<partition>:<service>:<region>:<account>:<resource>`; the resource
/// part may itself contain colons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn<'a> {
    pub partition: &'a str,
    pub service: &'a str,
    pub region: &'a str,
    pub account: &'a str,
    pub resource: &'a str,
}

impl<'a> Arn<'a> {
    /// Parse an ARN-shaped identifier
    pub fn parse(identifier: &'a str) -> ForgeResult<Self> {
        let mut parts = identifier.splitn(6, ':');

        let prefix = parts.next();
        let partition = parts.next();
        let service = parts.next();
        let region = parts.next();
        let account = parts.next();
        let resource = parts.next();

        match (prefix, partition, service, region, account, resource) {
            (Some("arn"), Some(partition), Some(service), Some(region), Some(account), Some(resource)) => {
                Ok(Self {
                    partition,
                    service,
                    region,
                    account,
                    resource,
                })
            }
            _ => Err(ForgeError::InvalidRoleIdentifier {
                action: String::new(),
                identifier: identifier.to_string(),
            }),
        }
    }

    /// The account component
    pub fn account(&self) -> &'a str {
        self.account
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_arn() {
        let arn = Arn::parse("arn:aws:iam::222222222222:role/deployer").unwrap();
        assert_eq!(arn.partition, "aws");
        assert_eq!(arn.service, "iam");
        assert_eq!(arn.region, "");
        assert_eq!(arn.account(), "222222222222");
        assert_eq!(arn.resource, "role/deployer");
    }

    #[test]
    fn test_resource_part_keeps_colons() {
        let arn = Arn::parse("arn:aws:kms:us-east-1:111111111111:key:extra").unwrap();
        assert_eq!(arn.resource, "key:extra");
    }

    #[test]
    fn test_reject_wrong_prefix() {
        assert!(Arn::parse("urn:aws:iam::1:role/x").is_err());
    }

    #[test]
    fn test_reject_too_few_components() {
        assert!(Arn::parse("arn:aws:iam").is_err());
        assert!(Arn::parse("not-an-arn").is_err());
    }
}
