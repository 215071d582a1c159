// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ordered tag rules shared by feature analysis and fusion

/// A predicate over some context that yields `tag` when it holds
pub struct Rule<C: 'static, T: 'static> {
    pub tag: T,
    pub applies: fn(&C) -> bool,
}

/// How the rules of one axis combine
pub enum RuleGroup<C: 'static, T: 'static> {
    /// Rules are checked in order and the first that holds wins
    FirstMatch(&'static [Rule<C, T>]),
    /// Every rule that holds contributes its tag
    Every(&'static [Rule<C, T>]),
}

/// Run each group in order, appending tags in evaluation order
pub fn evaluate<C: 'static, T: Copy + 'static>(groups: &[RuleGroup<C, T>], ctx: &C) -> Vec<T> {
    let mut tags = Vec::new();
    for group in groups {
        match group {
            RuleGroup::FirstMatch(rules) => {
                if let Some(rule) = rules.iter().find(|rule| (rule.applies)(ctx)) {
                    tags.push(rule.tag);
                }
            }
            RuleGroup::Every(rules) => {
                tags.extend(
                    rules
                        .iter()
                        .filter(|rule| (rule.applies)(ctx))
                        .map(|rule| rule.tag),
                );
            }
        }
    }
    tags
}
