//! Cloudflare `DnsProvider` implementation

use async_trait::async_trait;

use crate::error::Result;
use crate::providers::common::normalize_domain_name;
use crate::traits::{DnsProvider, ErrorContext};
use crate::types::{CreateDnsRecordRequest, DnsRecord, RecordQueryParams};

use super::types::CloudflareCreateRecord;
use super::{CloudflareDnsRecord, CloudflareProvider, MAX_PAGE_SIZE_RECORDS};

impl CloudflareProvider {
    pub(crate) fn cf_record_to_dns_record(cf_record: CloudflareDnsRecord, zone_id: &str) -> DnsRecord {
        DnsRecord {
            id: cf_record.id,
            zone_id: zone_id.to_string(),
            name: normalize_domain_name(&cf_record.name),
            record_type: cf_record.record_type,
            content: cf_record.content,
            ttl: cf_record.ttl,
            proxied: cf_record.proxied,
        }
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    async fn list_records(
        &self,
        zone_id: &str,
        params: &RecordQueryParams,
    ) -> Result<Vec<DnsRecord>> {
        let path = format!("/zones/{zone_id}/dns_records");
        let mut records = Vec::new();
        let mut page = 1_u32;

        loop {
            let mut query = vec![
                ("page", page.to_string()),
                ("per_page", MAX_PAGE_SIZE_RECORDS.to_string()),
            ];
            if let Some(name) = params.name.as_deref().filter(|n| !n.is_empty()) {
                query.push(("name", name.to_string()));
            }
            if let Some(record_type) = &params.record_type {
                query.push(("type", record_type.as_str().to_string()));
            }

            let (cf_records, has_more): (Vec<CloudflareDnsRecord>, bool) = self
                .get_page(&path, &query, ErrorContext::resource(zone_id))
                .await?;
            records.extend(
                cf_records
                    .into_iter()
                    .map(|r| Self::cf_record_to_dns_record(r, zone_id)),
            );

            if !has_more {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    async fn create_record(&self, req: &CreateDnsRecordRequest) -> Result<DnsRecord> {
        let body = CloudflareCreateRecord {
            record_type: req.record_type.as_str(),
            name: &req.name,
            content: &req.content,
            ttl: req.ttl,
            proxied: req.proxied,
        };

        let cf_record: CloudflareDnsRecord = self
            .post(
                &format!("/zones/{}/dns_records", req.zone_id),
                &body,
                ErrorContext::resource(&req.name),
            )
            .await?;

        log::info!(
            "[cloudflare] Created {} record {} -> {}",
            cf_record.record_type,
            cf_record.name,
            cf_record.content
        );
        Ok(Self::cf_record_to_dns_record(cf_record, &req.zone_id))
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.delete(
            &format!("/zones/{zone_id}/dns_records/{record_id}"),
            ErrorContext::resource(record_id),
        )
        .await?;
        log::info!("[cloudflare] Deleted record {record_id} in zone {zone_id}");
        Ok(())
    }
}
