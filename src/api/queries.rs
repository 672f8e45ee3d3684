macro_rules! with_event_fields {
    ($document:literal) => {
        concat!(
            $document,
            "\nfragment EventFields on Event {\n  id\n  title\n  description\n  location\n  coordinates\n  startDate\n  endDate\n  status\n  paymentType\n  eventType\n  eventProperties\n  price\n  currency\n  isFavorite\n  isParticipating\n  participantsCount\n}\n"
        )
    };
}

pub const EVENTS: &str = with_event_fields!(
    "query Events($filter: EventsFilterInput) {\n  events(filter: $filter) {\n    ...EventFields\n  }\n}"
);

pub const EVENT: &str = with_event_fields!(
    "query Event($id: ID!) {\n  event(id: $id) {\n    ...EventFields\n  }\n}"
);

pub const CREATE_EVENT: &str = with_event_fields!(
    "mutation CreateEvent($input: EventInput!) {\n  createEvent(input: $input) {\n    ...EventFields\n  }\n}"
);

pub const UPDATE_EVENT: &str = with_event_fields!(
    "mutation UpdateEvent($id: ID!, $input: EventInput!) {\n  updateEvent(id: $id, input: $input) {\n    ...EventFields\n  }\n}"
);

pub const DELETE_EVENT: &str =
    "mutation DeleteEvent($id: ID!) {\n  deleteEvent(id: $id)\n}";

pub const SET_FAVORITE: &str = with_event_fields!(
    "mutation SetFavorite($id: ID!, $value: Boolean!) {\n  setFavorite(id: $id, value: $value) {\n    ...EventFields\n  }\n}"
);

pub const SET_PARTICIPATION: &str = with_event_fields!(
    "mutation SetParticipation($id: ID!, $value: Boolean!) {\n  setParticipation(id: $id, value: $value) {\n    ...EventFields\n  }\n}"
);
