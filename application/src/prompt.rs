use domain::models::GenerationRequest;

const TEMPLATE: &str = "You are a world class customer support representative.
I will share a customer's message with you and you will give me the best answer that
I should send to this customer based on past best practices,
and you will follow ALL of the rules below:

1/ Response should be very similar or even identical to the past best practices,
in terms of length, tone of voice, logical arguments and other details

2/ If the best practices are irrelevant, then try to mimic the style of the best practices to the customer's message

Below is a message I received from the customer:
{message}

Here is a list of best practices of how we normally respond to customers in similar scenarios:
{best_practice}

Please write the best response that I should send to this customer:
";

/// Render the single prompt sent to the generation provider.
pub fn render(request: &GenerationRequest) -> String {
    let best_practice = if request.retrieved_examples.is_empty() {
        "(no past responses available)".to_string()
    } else {
        request
            .retrieved_examples
            .iter()
            .enumerate()
            .map(|(i, example)| format!("{}. {}", i + 1, example))
            .collect::<Vec<_>>()
            .join("\n\n")
    };
    // Examples first: the message slot precedes them, so neither insert can be
    // mistaken for the other slot.
    TEMPLATE
        .replacen("{best_practice}", &best_practice, 1)
        .replacen("{message}", request.contextual_message.trim_end(), 1)
}
