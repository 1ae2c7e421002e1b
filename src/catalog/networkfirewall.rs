// AWS Network Firewall resources managed by the ACK controller.

use super::DataSource;
use crate::schema::*;
use crate::types::CrdIdentity;

const GROUP: &str = "networkfirewall.services.k8s.aws";
const VERSION: &str = "v1alpha1";

const ENCRYPTION_TYPES: &[&str] = &["AWS_OWNED_KMS_KEY", "CUSTOMER_KMS"];
const RULE_ORDERS: &[&str] = &["DEFAULT_ACTION_ORDER", "STRICT_ORDER"];

pub fn data_sources() -> Vec<DataSource> {
    vec![firewall_policy(), firewall(), rule_group()]
}

fn encryption_configuration() -> Field {
    object(
        "encryptionConfiguration",
        vec![
            string("keyID"),
            enumeration("type", ENCRYPTION_TYPES).required(),
        ],
    )
    .doc("A complex type that contains optional Amazon Web Services Key Management Service (KMS) encryption settings.")
}

fn tags() -> Field {
    object_list("tags", vec![string("key").required(), string("value").required()])
        .doc("The key:value pairs to associate with the resource.")
}

fn rule_variables() -> Field {
    object(
        "ruleVariables",
        vec![
            object_map("ipSets", vec![string_list("definition").required()]),
            object_map("portSets", vec![string_list("definition")]),
        ],
    )
    .doc("Settings that are available for use in the rules in the rule group.")
}

fn firewall_policy() -> DataSource {
    DataSource {
        identity: CrdIdentity::new(GROUP, VERSION, "FirewallPolicy"),
        description: "The rule groups and policy actions to use in a firewall.",
        emits_id: true,
        spec: vec![
            string("description").doc("A description of the firewall policy."),
            encryption_configuration(),
            object(
                "firewallPolicy",
                vec![
                    object(
                        "policyVariables",
                        vec![object_map("ruleVariables", vec![string_list("definition").required()])],
                    ),
                    string_list("statefulDefaultActions")
                        .doc("The default actions to take on a packet that doesn't match any stateful rules."),
                    object(
                        "statefulEngineOptions",
                        vec![
                            enumeration("ruleOrder", RULE_ORDERS),
                            enumeration("streamExceptionPolicy", &["CONTINUE", "DROP", "REJECT"]),
                        ],
                    ),
                    object_list(
                        "statefulRuleGroupReferences",
                        vec![
                            object("override", vec![enumeration("action", &["DROP_TO_ALERT"])]),
                            bounded("priority", Some(1), Some(65535)),
                            string("resourceARN").required(),
                        ],
                    ),
                    object_list(
                        "statelessCustomActions",
                        vec![
                            object(
                                "actionDefinition",
                                vec![object(
                                    "publishMetricAction",
                                    vec![object_list("dimensions", vec![string("value").required()]).required()],
                                )],
                            )
                            .required(),
                            string("actionName").required(),
                        ],
                    ),
                    string_list("statelessDefaultActions")
                        .required()
                        .doc("The actions to take on a packet if it doesn't match any of the stateless rules in the policy."),
                    string_list("statelessFragmentDefaultActions")
                        .required()
                        .doc("The actions to take on a fragmented UDP packet if it doesn't match any of the stateless rules in the policy."),
                    object_list(
                        "statelessRuleGroupReferences",
                        vec![
                            bounded("priority", Some(1), Some(65535)).required(),
                            string("resourceARN").required(),
                        ],
                    ),
                    string("tlsInspectionConfigurationARN"),
                ],
            )
            .required()
            .doc("The rule groups and policy actions to use in the firewall policy."),
            string("firewallPolicyName")
                .required()
                .doc("The descriptive name of the firewall policy. You can't change the name of a firewall policy after you create it."),
            tags(),
        ],
    }
}

fn firewall() -> DataSource {
    DataSource {
        identity: CrdIdentity::new(GROUP, VERSION, "Firewall"),
        description: "The firewall defines the configuration settings for an Network Firewall firewall.",
        emits_id: true,
        spec: vec![
            boolean("deleteProtection")
                .doc("A flag indicating whether it is possible to delete the firewall."),
            string("description"),
            encryption_configuration(),
            string("firewallName").required(),
            string("firewallPolicyARN").required(),
            boolean("firewallPolicyChangeProtection"),
            object(
                "loggingConfiguration",
                vec![object_list(
                    "logDestinationConfigs",
                    vec![
                        string_map("logDestination").required(),
                        enumeration("logDestinationType", &["S3", "CloudWatchLogs", "KinesisDataFirehose"]).required(),
                        enumeration("logType", &["ALERT", "FLOW", "TLS"]).required(),
                    ],
                )
                .required()],
            ),
            boolean("subnetChangeProtection"),
            object_list(
                "subnetMappings",
                vec![
                    enumeration("ipAddressType", &["DUALSTACK", "IPV4", "IPV6"]),
                    string("subnetID").required(),
                ],
            )
            .required()
            .doc("The public subnets to use for your Network Firewall firewalls."),
            tags(),
            string("vpcID").required(),
        ],
    }
}

fn rule_group() -> DataSource {
    let header = object(
        "header",
        vec![
            string("destination").required(),
            string("destinationPort").required(),
            enumeration("direction", &["ANY", "FORWARD"]).required(),
            string("protocol").required(),
            string("source").required(),
            string("sourcePort").required(),
        ],
    );
    let addresses = |name: &'static str| object_list(name, vec![string("addressDefinition").required()]);
    let port_range = |name: &'static str| {
        object_list(
            name,
            vec![
                bounded("fromPort", Some(0), Some(65535)).required(),
                bounded("toPort", Some(0), Some(65535)).required(),
            ],
        )
    };

    DataSource {
        identity: CrdIdentity::new(GROUP, VERSION, "RuleGroup"),
        description: "The object that defines the rules in a rule group.",
        emits_id: true,
        spec: vec![
            integer("capacity")
                .required()
                .doc("The maximum operating resources that this rule group can use."),
            string("description"),
            boolean("dryRun"),
            encryption_configuration(),
            object(
                "ruleGroup",
                vec![
                    object(
                        "referenceSets",
                        vec![object_map("ipSetReferences", vec![string("referenceARN")])],
                    ),
                    rule_variables(),
                    object(
                        "rulesSource",
                        vec![
                            object(
                                "rulesSourceList",
                                vec![
                                    enumeration("generatedRulesType", &["ALLOWLIST", "DENYLIST"]).required(),
                                    string_list("targetTypes").required(),
                                    string_list("targets").required(),
                                ],
                            ),
                            string("rulesString"),
                            object_list(
                                "statefulRules",
                                vec![
                                    enumeration("action", &["PASS", "DROP", "ALERT", "REJECT"]).required(),
                                    header,
                                    object_list(
                                        "ruleOptions",
                                        vec![string("keyword").required(), string_list("settings")],
                                    )
                                    .required(),
                                ],
                            ),
                            object(
                                "statelessRulesAndCustomActions",
                                vec![object_list(
                                    "statelessRules",
                                    vec![
                                        bounded("priority", Some(1), Some(65535)).required(),
                                        object(
                                            "ruleDefinition",
                                            vec![
                                                string_list("actions").required(),
                                                object(
                                                    "matchAttributes",
                                                    vec![
                                                        port_range("destinationPorts"),
                                                        addresses("destinations")
                                                            .doc("The destination IP addresses and address ranges to inspect for."),
                                                        Field::new(
                                                            "protocols",
                                                            FieldType::List(Box::new(FieldType::Integer {
                                                                min: Some(0),
                                                                max: Some(255),
                                                            })),
                                                        ),
                                                        port_range("sourcePorts"),
                                                        addresses("sources"),
                                                    ],
                                                )
                                                .required(),
                                            ],
                                        )
                                        .required(),
                                    ],
                                )
                                .required()],
                            ),
                        ],
                    )
                    .required(),
                    object("statefulRuleOptions", vec![enumeration("ruleOrder", RULE_ORDERS)]),
                ],
            ),
            string("ruleGroupName").required(),
            string("rules").doc("A string containing stateful rule group rules specifications in Suricata flat format."),
            object("sourceMetadata", vec![string("sourceARN"), string("sourceUpdateToken")]),
            tags(),
            enumeration("type", &["STATEFUL", "STATELESS"])
                .required()
                .doc("Indicates whether the rule group is stateless or stateful."),
        ],
    }
}
